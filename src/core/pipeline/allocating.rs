use std::ops::Range;

use rand::Rng;

use crate::{
    config::WorkloadConfig,
    core::domain::{Block, Release},
};

/// Produces randomly sized blocks whose pages have all been written once.
#[derive(Debug)]
pub struct Allocator<R> {
    rng: R,
    sizes: Range<usize>,
    stride: usize,
}

impl<R: Rng> Allocator<R> {
    pub fn new(rng: R, config: &WorkloadConfig) -> Self {
        Self {
            rng,
            sizes: config.min_block_size..config.max_block_size,
            stride: config.touch_stride,
        }
    }

    pub fn allocate(&mut self) -> Block {
        let size = self.rng.gen_range(self.sizes.clone());
        let mut data = vec![0u8; size];
        touch(&mut data, self.stride, &mut self.rng);
        Block::new(data)
    }
}

/// Writes one random byte at every `stride` offset so the pages backing `buf`
/// are committed. Returns the number of bytes written.
pub fn touch<R: Rng + ?Sized>(buf: &mut [u8], stride: usize, rng: &mut R) -> usize {
    let mut touched = 0;
    for byte in buf.iter_mut().step_by(stride) {
        *byte = rng.r#gen();
        touched += 1;
    }
    touched
}

/// Insertion-ordered blocks, oldest first.
#[derive(Debug)]
pub struct WorkingSet {
    blocks: Vec<Block>,
    cap: usize,
}

impl WorkingSet {
    pub fn new(cap: usize) -> Self {
        Self {
            blocks: Vec::with_capacity(cap + 1),
            cap,
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Drops the older half in one step once the set holds more than `cap` blocks.
    pub fn retain(&mut self) -> Release {
        if self.blocks.len() <= self.cap {
            return Release::default();
        }

        let split = self.blocks.len() / 2;
        self.blocks
            .drain(..split)
            .fold(Release::default(), |release, block| Release {
                blocks: release.blocks + 1,
                bytes: release.bytes + block.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[cfg(test)]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// Allocator and working set driven together by the allocation tick.
#[derive(Debug)]
pub struct Workload<R> {
    allocator: Allocator<R>,
    working_set: WorkingSet,
}

impl<R: Rng> Workload<R> {
    pub fn new(rng: R, config: &WorkloadConfig) -> Self {
        Self {
            allocator: Allocator::new(rng, config),
            working_set: WorkingSet::new(config.retention_cap),
        }
    }

    /// Allocates one block, appends it, then applies the retention rule.
    pub fn tick(&mut self) -> Release {
        let block = self.allocator.allocate();
        tracing::debug!(
            size = block.len(),
            retained = self.working_set.len() + 1,
            "allocated block"
        );
        self.working_set.push(block);

        let release = self.working_set.retain();
        if release.blocks > 0 {
            tracing::debug!(
                blocks = release.blocks,
                bytes = release.bytes,
                retained = self.working_set.len(),
                "released older half of working set"
            );
        }
        release
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }
}
