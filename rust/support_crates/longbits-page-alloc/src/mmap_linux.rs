use std::sync::OnceLock;

/// Allocates memory using standard pages via an anonymous private `mmap`.
///
/// The allocation is rounded up to the nearest page boundary.
///
/// # Returns
///
/// - `Ok((ptr, capacity))` - a pointer to the mapped region and its actual capacity
///   in bytes (a multiple of the page size, never zero)
/// - `Err(io::Error)` - if the mapping fails
///
/// # Safety
///
/// The returned pointer must be released with [`free`] using the returned capacity.
pub fn allocate(size: usize) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let capacity = page_capacity(size);
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            capacity,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if ptr.is_null() || ptr == libc::MAP_FAILED {
        let err = std::io::Error::last_os_error();
        return Err(err);
    }
    Ok((ptr, capacity))
}

/// Resizes a region previously returned by [`allocate`] or [`reallocate`].
///
/// Bytes up to `min(old_capacity, new capacity)` are preserved; the region may move.
/// When the page-rounded capacity does not change, the same pointer is returned and
/// no system call is made.
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
    let new_capacity = page_capacity(new_size);
    if new_capacity == capacity {
        return Ok((ptr, capacity));
    }
    let new_ptr = unsafe { libc::mremap(ptr, capacity, new_capacity, libc::MREMAP_MAYMOVE) };
    if new_ptr.is_null() || new_ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    Ok((new_ptr, new_capacity))
}

/// Frees memory that was allocated using standard pages.
///
/// # Safety
///
/// - `ptr` was returned by [`allocate`] or [`reallocate`]
/// - `size` matches the capacity returned by that call
/// - the memory has not already been freed
pub unsafe fn free(ptr: *mut std::ffi::c_void, size: usize) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr, size) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Gets the system's standard page size in bytes.
///
/// The value is cached after the first call. Falls back to 4KB if
/// `sysconf(_SC_PAGESIZE)` fails.
pub fn get_page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    if let Some(&size) = SIZE.get() {
        size
    } else {
        match read_page_size() {
            Ok(size) => {
                let _ = SIZE.set(size);
                size
            }
            Err(_) => 4 * 1024,
        }
    }
}

fn page_capacity(size: usize) -> usize {
    let page_size = get_page_size();
    assert!(page_size.is_power_of_two());
    (size.max(1) + page_size - 1) & !(page_size - 1)
}

fn read_page_size() -> std::io::Result<usize> {
    let res = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    assert!(res < i32::MAX as _);
    Ok(res as usize)
}
