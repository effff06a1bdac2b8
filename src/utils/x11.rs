use anyhow::{anyhow, Result};
use std::{env, ffi::CStr, ffi::CString};
use ::x11::xlib;

use crate::platform::factory::ScaleSource;

const BASE_DPI: f64 = 96.0;

pub struct Display {
    raw: *mut xlib::Display,
}

impl Display {
    pub fn new() -> Result<Self> {
        unsafe {
            xlib::XSetErrorHandler(Some(Self::error_handler));
        }

        let display_name = env::var("DISPLAY").unwrap_or_else(|_| String::from(":0"));
        let c_display_name =
            CString::new(display_name).map_err(|_| anyhow!("Invalid DISPLAY variable"))?;
        let raw = unsafe { xlib::XOpenDisplay(c_display_name.as_ptr()) };

        if raw.is_null() {
            return Err(anyhow!("Failed to open X display"));
        }

        Ok(Self { raw })
    }

    pub fn raw(&self) -> *mut xlib::Display {
        self.raw
    }

    pub fn root(&self) -> xlib::Window {
        unsafe { xlib::XDefaultRootWindow(self.raw) }
    }

    pub fn sync(&self) {
        unsafe {
            xlib::XSync(self.raw, 0);
        }
    }

    /// Value of `Xft.dpi` from the server's resource database, if set.
    pub fn xft_dpi(&self) -> Option<f64> {
        let resources = unsafe { xlib::XResourceManagerString(self.raw) };
        if resources.is_null() {
            return None;
        }

        let resources = unsafe { CStr::from_ptr(resources) }.to_string_lossy();
        parse_xft_dpi(&resources)
    }

    unsafe extern "C" fn error_handler(
        display: *mut xlib::Display,
        e: *mut xlib::XErrorEvent,
    ) -> i32 {
        let mut error_text = [0 as std::os::raw::c_char; 1024];
        xlib::XGetErrorText(
            display,
            (*e).error_code as i32,
            error_text.as_mut_ptr(),
            error_text.len() as i32,
        );

        let error_msg = CStr::from_ptr(error_text.as_ptr())
            .to_string_lossy()
            .into_owned();

        log::error!(
            "X11 Error: {} (code: {}, resource id: {}, request code: {})",
            error_msg,
            (*e).error_code,
            (*e).resourceid,
            (*e).request_code
        );

        0
    }
}

impl ScaleSource for Display {
    fn scale_factor(&self) -> f64 {
        self.xft_dpi().map(|dpi| dpi / BASE_DPI).unwrap_or(1.0)
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.raw);
        }
    }
}

fn parse_xft_dpi(resources: &str) -> Option<f64> {
    resources.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() != "Xft.dpi" {
            return None;
        }

        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|dpi| dpi.is_finite() && *dpi > 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_xft_dpi() {
        let resources = "Xcursor.size:\t24\nXft.dpi:\t192\nXft.antialias:\t1\n";
        assert_eq!(parse_xft_dpi(resources), Some(192.0));
    }

    #[test]
    fn ignores_missing_or_bad_dpi() {
        assert_eq!(parse_xft_dpi("Xcursor.size:\t24\n"), None);
        assert_eq!(parse_xft_dpi("Xft.dpi:\tlots\n"), None);
        assert_eq!(parse_xft_dpi("Xft.dpi:\t0\n"), None);
        assert_eq!(parse_xft_dpi(""), None);
    }
}
