//! Tube conveyor
//!
//! A fixed ring of tubes scrolls left forever. Tubes are never created or
//! destroyed after setup: once a tube leaves the screen it jumps one full lap
//! ahead and gets a new gap offset, keeping its slot in the ring.

use rand::Rng;

use super::collision::Rect;
use crate::settings::{Dimensions, Tuning};

/// Tube geometry derived from screen and sprite sizes.
///
/// Computed once at initialization and never mutated during play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeLayout {
    pub tube_width: f32,
    pub tube_height: f32,
    /// Opening between lower and upper block
    pub gap: f32,
    /// Lowest allowed lower-block y
    pub min_offset: f32,
    /// Highest allowed lower-block y
    pub max_offset: f32,
    /// Horizontal distance between neighbouring tubes
    pub spacing: f32,
    /// Number of tubes on the conveyor
    pub count: usize,
}

impl TubeLayout {
    pub fn derive(dims: &Dimensions, tuning: &Tuning) -> Self {
        let tube_width = dims.tube_block.x;
        let tube_height = dims.tube_block.y;
        let screen_height = dims.screen.y;
        let gap = tuning.gap;

        // Lower block top >= min_tube_pos, upper block bottom <= screen - min_tube_pos
        let low = tuning.min_tube_pos - tube_height;
        let high = screen_height - tuning.min_tube_pos - gap - tube_height;

        if high < low {
            log::warn!(
                "Screen height {} leaves no room for a {} gap with {} margins; offsets span [{}, {}]",
                screen_height,
                gap,
                tuning.min_tube_pos,
                high,
                low
            );
        }
        let min_offset = low.min(high);
        let max_offset = low.max(high);

        Self {
            tube_width,
            tube_height,
            gap,
            min_offset,
            max_offset,
            spacing: dims.screen.x * tuning.tube_spacing_ratio,
            count: tuning.num_tubes,
        }
    }

    /// Distance a tube jumps when recycled
    #[inline]
    pub fn cycle_length(&self) -> f32 {
        self.count as f32 * self.spacing
    }

    /// Draw a gap offset uniformly from `[min_offset, max_offset]`
    pub fn random_offset<R: Rng>(&self, rng: &mut R) -> f32 {
        self.min_offset + (self.max_offset - self.min_offset) * rng.random::<f32>()
    }
}

/// One gapped tube: a lower and an upper block sharing `x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tube {
    /// Left edge of both blocks
    pub x: f32,
    /// Bottom of the lower block
    pub offset: f32,
}

impl Tube {
    pub fn lower_rect(&self, layout: &TubeLayout) -> Rect {
        Rect::new(self.x, self.offset, layout.tube_width, layout.tube_height)
    }

    pub fn upper_rect(&self, layout: &TubeLayout) -> Rect {
        Rect::new(
            self.x,
            self.upper_y(layout),
            layout.tube_width,
            layout.tube_height,
        )
    }

    /// Bottom of the upper block
    #[inline]
    pub fn upper_y(&self, layout: &TubeLayout) -> f32 {
        self.offset + layout.tube_height + layout.gap
    }

    /// Vertical centre of the opening
    #[inline]
    pub fn gap_center(&self, layout: &TubeLayout) -> f32 {
        self.offset + layout.tube_height + layout.gap / 2.0
    }
}

/// Fixed-capacity ring of tubes
#[derive(Debug, Clone)]
pub struct Conveyor {
    layout: TubeLayout,
    tubes: Box<[Tube]>,
}

impl Conveyor {
    /// Lay out `layout.count` tubes starting at `start_x`, one spacing apart
    pub fn new<R: Rng>(layout: TubeLayout, start_x: f32, rng: &mut R) -> Self {
        let tubes = (0..layout.count)
            .map(|i| Tube {
                x: start_x + i as f32 * layout.spacing,
                offset: layout.random_offset(rng),
            })
            .collect();
        Self { layout, tubes }
    }

    /// Put every tube back at its starting slot with a fresh offset
    pub fn reset<R: Rng>(&mut self, start_x: f32, rng: &mut R) {
        let layout = self.layout;
        for (i, tube) in self.tubes.iter_mut().enumerate() {
            tube.x = start_x + i as f32 * layout.spacing;
            tube.offset = layout.random_offset(rng);
        }
    }

    /// Scroll every tube left by `distance`, recycling the ones that left the
    /// screen. Returns how many tubes were recycled.
    pub fn advance<R: Rng>(&mut self, distance: f32, rng: &mut R) -> usize {
        let layout = self.layout;
        let mut recycled = 0;

        let exit_x = -f64::from(layout.tube_width);
        let cycle = f64::from(layout.cycle_length());

        for (i, tube) in self.tubes.iter_mut().enumerate() {
            let x = f64::from(tube.x) - f64::from(distance);

            if x < exit_x {
                // Jump whole laps relative to the overshoot, never to a fixed x
                tube.x = (exit_x + (x - exit_x).rem_euclid(cycle)) as f32;
                tube.offset = layout.random_offset(rng);
                recycled += 1;
                log::debug!("Tube {} recycled to x={:.1}", i, tube.x);
            } else {
                tube.x -= distance;
            }
        }

        recycled
    }

    #[inline]
    pub fn layout(&self) -> &TubeLayout {
        &self.layout
    }

    #[inline]
    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tubes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tubes.is_empty()
    }

    /// Lower and upper block colliders for every tube, in ring order
    pub fn colliders(&self) -> impl Iterator<Item = (usize, [Rect; 2])> + '_ {
        self.tubes.iter().enumerate().map(|(i, tube)| {
            (
                i,
                [tube.lower_rect(&self.layout), tube.upper_rect(&self.layout)],
            )
        })
    }

    #[cfg(test)]
    pub(crate) fn tubes_mut(&mut self) -> &mut [Tube] {
        &mut self.tubes
    }
}
