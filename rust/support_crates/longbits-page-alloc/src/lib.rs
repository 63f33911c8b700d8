pub mod native_block;
pub mod stats;

#[cfg_attr(target_os = "linux", path = "mmap_linux.rs")]
#[cfg_attr(not(target_os = "linux"), path = "mmap_fallback.rs")]
pub mod mmap;


/// Rounds `n` up to the next multiple of the regular page size.
#[inline]
pub fn align_to_page(n: u64) -> u64 {
    let page_size = mmap::get_page_size() as u64;
    debug_assert!(page_size.is_power_of_two());
    (n + page_size - 1) & !(page_size - 1)
}
