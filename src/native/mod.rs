/// Native module reads heap counters straight from the allocator
/// the binary is linked against.
pub mod jemalloc;
