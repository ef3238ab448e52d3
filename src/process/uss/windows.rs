use std::io;
use std::mem::{self, MaybeUninit};

use windows_sys::Win32::Foundation::CloseHandle;
use windows_sys::Win32::System::ProcessStatus::{
    GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS, PROCESS_MEMORY_COUNTERS_EX,
};
use windows_sys::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_VM_READ,
};

/// USS in bytes: the process's private bytes.
pub fn unique_set_size(pid: u32) -> io::Result<u64> {
    // SAFETY: OpenProcess takes no pointers; a null handle signals failure.
    let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION | PROCESS_VM_READ, 0, pid) };
    if handle.is_null() {
        return Err(io::Error::last_os_error());
    }

    let mut pmc = MaybeUninit::<PROCESS_MEMORY_COUNTERS_EX>::zeroed();
    let pmc_len = mem::size_of::<PROCESS_MEMORY_COUNTERS_EX>() as u32;

    // SAFETY: the buffer is a PROCESS_MEMORY_COUNTERS_EX of `pmc_len` bytes,
    // which GetProcessMemoryInfo accepts in place of PROCESS_MEMORY_COUNTERS.
    let result = unsafe {
        GetProcessMemoryInfo(handle, pmc.as_mut_ptr() as *mut PROCESS_MEMORY_COUNTERS, pmc_len)
    };
    let error = (result == 0).then(io::Error::last_os_error);

    // SAFETY: the handle came from OpenProcess and is closed once.
    unsafe {
        CloseHandle(handle);
    }

    match error {
        Some(e) => Err(e),
        None => {
            // SAFETY: GetProcessMemoryInfo succeeded and filled the structure.
            let pmc = unsafe { pmc.assume_init() };
            Ok(pmc.PrivateUsage as u64)
        }
    }
}
