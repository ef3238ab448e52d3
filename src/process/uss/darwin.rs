use std::io;
use std::mem;
use std::os::raw::c_int;

use mach2::kern_return::{KERN_INVALID_ADDRESS, KERN_SUCCESS};
use mach2::mach_port::mach_port_deallocate;
use mach2::message::mach_msg_type_number_t;
use mach2::port::{mach_port_name_t, mach_port_t, MACH_PORT_NULL};
use mach2::traps::{mach_task_self, task_for_pid};
use mach2::vm::mach_vm_region;
use mach2::vm_page_size::vm_page_size;
use mach2::vm_region::{vm_region_top_info_data_t, VM_REGION_TOP_INFO};
use mach2::vm_types::{mach_vm_address_t, mach_vm_size_t};

// Share modes of `vm_region_top_info`, from <mach/vm_region.h>.
const SM_COW: u8 = 1;
const SM_PRIVATE: u8 = 2;
const SM_LARGE_PAGE: u8 = 8;

/// Task port of another process, released on drop.
struct TaskPort(mach_port_name_t);

impl TaskPort {
    fn for_pid(pid: u32) -> io::Result<Self> {
        let target = c_int::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid pid {}", pid)))?;
        let mut task: mach_port_name_t = MACH_PORT_NULL;

        // SAFETY: `task` is a valid out pointer for the port name.
        let kr = unsafe { task_for_pid(mach_task_self(), target, &mut task) };
        if kr != KERN_SUCCESS {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("task_for_pid({}) failed with kern_return {}", pid, kr),
            ));
        }
        Ok(Self(task))
    }
}

impl Drop for TaskPort {
    fn drop(&mut self) {
        // SAFETY: the port name was obtained from task_for_pid and is released once.
        unsafe {
            mach_port_deallocate(mach_task_self(), self.0);
        }
    }
}

/// USS in bytes: resident pages private to the task.
///
/// Private and large-page regions count fully. Copy-on-write regions count
/// their private pages, plus their shared pages when no other task maps them.
pub fn unique_set_size(pid: u32) -> io::Result<u64> {
    let task = TaskPort::for_pid(pid)?;
    let mut private_pages: u64 = 0;
    let mut address: mach_vm_address_t = 0;

    loop {
        // SAFETY: vm_region_top_info is plain old data.
        let mut info: vm_region_top_info_data_t = unsafe { mem::zeroed() };
        let mut count = (mem::size_of::<vm_region_top_info_data_t>() / mem::size_of::<c_int>())
            as mach_msg_type_number_t;
        let mut size: mach_vm_size_t = 0;
        let mut object_name: mach_port_t = MACH_PORT_NULL;

        // SAFETY: every out pointer is valid and `count` matches the size of `info`.
        let kr = unsafe {
            mach_vm_region(
                task.0,
                &mut address,
                &mut size,
                VM_REGION_TOP_INFO,
                (&mut info as *mut _) as *mut c_int,
                &mut count,
                &mut object_name,
            )
        };
        if kr == KERN_INVALID_ADDRESS {
            break;
        }
        if kr != KERN_SUCCESS {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("mach_vm_region failed for pid {} with kern_return {}", pid, kr),
            ));
        }

        let private = u64::from(info.private_pages_resident);
        let shared = u64::from(info.shared_pages_resident);
        match info.share_mode as u8 {
            SM_PRIVATE | SM_LARGE_PAGE => private_pages += private + shared,
            SM_COW => {
                private_pages += private;
                if info.ref_count == 1 {
                    private_pages += shared;
                }
            }
            _ => {}
        }

        if size == 0 {
            break;
        }
        address = address.saturating_add(size);
    }

    // SAFETY: vm_page_size is initialized by the runtime before main.
    let page_size = unsafe { vm_page_size } as u64;
    Ok(private_pages * page_size)
}
