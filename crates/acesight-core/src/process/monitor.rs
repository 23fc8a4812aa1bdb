#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

use crate::error::{Error, Result};
use crate::source::ProcessMonitor;

#[cfg(target_os = "windows")]
use std::ffi::OsString;
#[cfg(target_os = "windows")]
use std::os::windows::ffi::OsStringExt;
#[cfg(target_os = "windows")]
use windows::Win32::Foundation::CloseHandle;
#[cfg(target_os = "windows")]
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW, TH32CS_SNAPPROCESS,
};
#[cfg(target_os = "windows")]
use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowThreadProcessId};

/// Game process lookup through the OS process table
#[derive(Debug, Clone)]
pub struct SystemProcessMonitor {
    process_name: String,
}

impl SystemProcessMonitor {
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
        }
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }
}

impl ProcessMonitor for SystemProcessMonitor {
    fn is_process_running(&self) -> bool {
        match find_process_ids(&self.process_name) {
            Ok(pids) => !pids.is_empty(),
            Err(e) => {
                tracing::debug!(tag = "PROCESS", "process enumeration failed: {}", e);
                false
            }
        }
    }

    fn is_process_focused(&self) -> bool {
        let Some(foreground) = foreground_process_id() else {
            return false;
        };
        match find_process_ids(&self.process_name) {
            Ok(pids) => pids.contains(&foreground),
            Err(e) => {
                tracing::debug!(tag = "PROCESS", "focus check failed: {}", e);
                false
            }
        }
    }
}

/// Ids of every process whose executable name equals `name` (case-insensitive)
#[cfg(target_os = "windows")]
pub fn find_process_ids(name: &str) -> Result<Vec<u32>> {
    // SAFETY: CreateToolhelp32Snapshot with TH32CS_SNAPPROCESS is safe to call.
    // The returned handle is closed at the end of this function.
    let snapshot = unsafe {
        CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
            .map_err(|e| Error::ProcessNotFound(e.to_string()))?
    };

    let mut entry = PROCESSENTRY32W {
        dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    let mut pids = Vec::new();
    // SAFETY: Process32FirstW and Process32NextW are called with a valid snapshot handle
    // and an initialized PROCESSENTRY32W whose dwSize is set.
    unsafe {
        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                let len = entry
                    .szExeFile
                    .iter()
                    .position(|&c| c == 0)
                    .unwrap_or(entry.szExeFile.len());
                let exe_name = OsString::from_wide(&entry.szExeFile[..len]);
                if exe_name.to_string_lossy().eq_ignore_ascii_case(name) {
                    pids.push(entry.th32ProcessID);
                }
                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }
    }

    // SAFETY: snapshot is a valid handle from CreateToolhelp32Snapshot
    let _ = unsafe { CloseHandle(snapshot) };
    Ok(pids)
}

#[cfg(not(target_os = "windows"))]
pub fn find_process_ids(_name: &str) -> Result<Vec<u32>> {
    Err(Error::ProcessNotFound(
        "Windows only: process enumeration not supported on this platform".to_string(),
    ))
}

#[cfg(target_os = "windows")]
fn foreground_process_id() -> Option<u32> {
    // SAFETY: GetForegroundWindow takes no arguments and may return a null window,
    // which is checked before use.
    let window = unsafe { GetForegroundWindow() };
    if window.is_invalid() {
        return None;
    }
    let mut pid: u32 = 0;
    // SAFETY: window is a non-null handle and pid is a valid out pointer for the call.
    let thread = unsafe { GetWindowThreadProcessId(window, Some(&mut pid)) };
    (thread != 0 && pid != 0).then_some(pid)
}

#[cfg(not(target_os = "windows"))]
fn foreground_process_id() -> Option<u32> {
    None
}
