//! Generators filling a `BlockStore` before the game starts.

use crate::world::{BlockPos, BlockStore};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// A world generator
pub trait WorldGenerator: Send {
    /// Fill `store` with the blocks of the world, reporting progress between 0 and 1.
    /// The result must always be the same, independently of the previous calls to this function!
    fn generate(&mut self, store: &mut BlockStore, progress: &mut dyn FnMut(f32)) -> Result<()>;
}

/// A square slab of blocks centered on the origin, `depth` blocks thick, with its top layer at `top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatGenerator {
    pub radius: i64,
    pub top: i64,
    pub depth: u32,
}

impl WorldGenerator for FlatGenerator {
    fn generate(&mut self, store: &mut BlockStore, progress: &mut dyn FnMut(f32)) -> Result<()> {
        ensure!(self.radius >= 0, "flat world radius must be non-negative, got {}", self.radius);
        let side = 2 * self.radius + 1;
        for (row, px) in (-self.radius..=self.radius).enumerate() {
            for pz in -self.radius..=self.radius {
                for layer in 0..self.depth as i64 {
                    store.add_block(BlockPos {
                        px,
                        py: self.top - layer,
                        pz,
                    });
                }
            }
            progress((row + 1) as f32 / side as f32);
        }
        Ok(())
    }
}

/// A square grid of blocks centered on the origin, climbing by `step_height` for every step along x or z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaircaseGenerator {
    pub grid_size: u32,
    pub step_height: i64,
}

impl WorldGenerator for StaircaseGenerator {
    fn generate(&mut self, store: &mut BlockStore, progress: &mut dyn FnMut(f32)) -> Result<()> {
        let size = self.grid_size as i64;
        let offset = (size - 1).max(0) / 2;
        for x in 0..size {
            for z in 0..size {
                store.add_block(BlockPos {
                    px: x - offset,
                    py: (x + z) * self.step_height,
                    pz: z - offset,
                });
            }
            progress((x + 1) as f32 / size as f32);
        }
        Ok(())
    }
}

/// The kind of world to generate, as read from the settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorldKind {
    Flat(FlatGenerator),
    Staircase(StaircaseGenerator),
}

impl Default for WorldKind {
    fn default() -> Self {
        WorldKind::Flat(FlatGenerator {
            radius: 16,
            top: 0,
            depth: 1,
        })
    }
}

impl WorldKind {
    pub fn into_generator(self) -> Box<dyn WorldGenerator> {
        match self {
            WorldKind::Flat(generator) => Box::new(generator),
            WorldKind::Staircase(generator) => Box::new(generator),
        }
    }
}
