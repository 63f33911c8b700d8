use std::alloc::{Layout, alloc, dealloc, realloc};

/// Allocates page-aligned memory (emulated with the global allocator).
///
/// Unlike anonymous mappings, the returned memory is not zeroed.
pub fn allocate(size: usize) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let page_size = get_page_size();
    let capacity = page_capacity(size);
    let layout = page_layout(capacity, page_size)?;

    let ptr = unsafe { alloc(layout) };
    if ptr.is_null() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::OutOfMemory,
            "Failed to allocate memory",
        ));
    }

    Ok((ptr as *mut std::ffi::c_void, capacity))
}

/// Resizes a region previously returned by [`allocate`] or [`reallocate`].
///
/// # Safety
///
/// - `ptr`/`capacity` must describe a live region returned by this module
/// - on success the old pointer must no longer be used
pub unsafe fn reallocate(
    ptr: *mut std::ffi::c_void,
    capacity: usize,
    new_size: usize,
) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let page_size = get_page_size();
    let new_capacity = page_capacity(new_size);
    if new_capacity == capacity {
        return Ok((ptr, capacity));
    }
    let layout = page_layout(capacity, page_size)?;
    let new_ptr = unsafe { realloc(ptr as *mut u8, layout, new_capacity) };
    if new_ptr.is_null() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::OutOfMemory,
            "Failed to reallocate memory",
        ));
    }
    Ok((new_ptr as *mut std::ffi::c_void, new_capacity))
}

/// Frees memory that was allocated using standard pages.
///
/// # Safety
///
/// `ptr`/`size` must describe a live region returned by this module.
pub unsafe fn free(ptr: *mut std::ffi::c_void, size: usize) -> std::io::Result<()> {
    let page_size = get_page_size();
    assert!(size.is_multiple_of(page_size));
    let layout = page_layout(size, page_size)?;

    unsafe {
        dealloc(ptr as *mut u8, layout);
    }
    Ok(())
}

/// Returns the "standard page" size in bytes.
pub fn get_page_size() -> usize {
    4 * 1024
}

fn page_capacity(size: usize) -> usize {
    let page_size = get_page_size();
    (size.max(1) + page_size - 1) & !(page_size - 1)
}

fn page_layout(size: usize, page_size: usize) -> std::io::Result<Layout> {
    Layout::from_size_align(size, page_size)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid layout"))
}
