//! Settings panel widgets provided by the host's UI toolkit through a C function table.

use std::ffi::{CString, c_char, c_void};

use mirage_core::SettingsUi;

/// Widget callbacks. Labels are NUL-terminated UTF-8; `user_data` is passed back untouched.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct UiCallbacks {
    pub user_data: *mut c_void,
    pub checkbox: unsafe extern "C" fn(*mut c_void, *const c_char, *mut bool) -> bool,
    pub input_int: unsafe extern "C" fn(*mut c_void, *const c_char, *mut i32) -> bool,
    pub text: unsafe extern "C" fn(*mut c_void, *const c_char),
    pub indent: unsafe extern "C" fn(*mut c_void),
    pub unindent: unsafe extern "C" fn(*mut c_void),
    pub begin_disabled: unsafe extern "C" fn(*mut c_void, bool),
    pub end_disabled: unsafe extern "C" fn(*mut c_void),
}

/// [`SettingsUi`] over a host callback table.
pub struct CallbackUi<'a> {
    callbacks: &'a UiCallbacks,
}

impl<'a> CallbackUi<'a> {
    pub fn new(callbacks: &'a UiCallbacks) -> Self {
        Self { callbacks }
    }
}

fn c_label(label: &str) -> CString {
    CString::new(label).unwrap_or_default()
}

impl SettingsUi for CallbackUi<'_> {
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let label = c_label(label);
        unsafe { (self.callbacks.checkbox)(self.callbacks.user_data, label.as_ptr(), value) }
    }

    fn input_int(&mut self, label: &str, value: &mut i32) -> bool {
        let label = c_label(label);
        unsafe { (self.callbacks.input_int)(self.callbacks.user_data, label.as_ptr(), value) }
    }

    fn text(&mut self, text: &str) {
        let text = c_label(text);
        unsafe { (self.callbacks.text)(self.callbacks.user_data, text.as_ptr()) }
    }

    fn indent(&mut self) {
        unsafe { (self.callbacks.indent)(self.callbacks.user_data) }
    }

    fn unindent(&mut self) {
        unsafe { (self.callbacks.unindent)(self.callbacks.user_data) }
    }

    fn begin_disabled(&mut self, disabled: bool) {
        unsafe { (self.callbacks.begin_disabled)(self.callbacks.user_data, disabled) }
    }

    fn end_disabled(&mut self) {
        unsafe { (self.callbacks.end_disabled)(self.callbacks.user_data) }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    unsafe fn recorder<'a>(user_data: *mut c_void) -> &'a mut Recorder {
        unsafe { &mut *(user_data as *mut Recorder) }
    }

    unsafe fn label(ptr: *const c_char) -> String {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    unsafe extern "C" fn checkbox(user: *mut c_void, l: *const c_char, v: *mut bool) -> bool {
        unsafe {
            recorder(user).calls.push(format!("checkbox {}", label(l)));
            *v = !*v;
        }
        true
    }

    unsafe extern "C" fn input_int(user: *mut c_void, l: *const c_char, v: *mut i32) -> bool {
        unsafe {
            recorder(user).calls.push(format!("input {}", label(l)));
            *v += 1;
        }
        true
    }

    unsafe extern "C" fn text(user: *mut c_void, l: *const c_char) {
        unsafe { recorder(user).calls.push(format!("text {}", label(l))) }
    }

    unsafe extern "C" fn indent(user: *mut c_void) {
        unsafe { recorder(user).calls.push("indent".into()) }
    }

    unsafe extern "C" fn unindent(user: *mut c_void) {
        unsafe { recorder(user).calls.push("unindent".into()) }
    }

    unsafe extern "C" fn begin_disabled(user: *mut c_void, disabled: bool) {
        unsafe { recorder(user).calls.push(format!("begin_disabled {disabled}")) }
    }

    unsafe extern "C" fn end_disabled(user: *mut c_void) {
        unsafe { recorder(user).calls.push("end_disabled".into()) }
    }

    #[test]
    fn forwards_labels_and_values() {
        let mut rec = Recorder::default();
        let callbacks = UiCallbacks {
            user_data: &mut rec as *mut Recorder as *mut c_void,
            checkbox,
            input_int,
            text,
            indent,
            unindent,
            begin_disabled,
            end_disabled,
        };
        let mut ui = CallbackUi::new(&callbacks);

        let mut flag = false;
        let mut x = 41;
        assert!(ui.checkbox("Hide window", &mut flag));
        assert!(ui.input_int("X", &mut x));
        ui.text("Window position");
        ui.indent();
        ui.begin_disabled(true);
        ui.end_disabled();
        ui.unindent();

        assert!(flag);
        assert_eq!(x, 42);
        assert_eq!(
            rec.calls,
            [
                "checkbox Hide window",
                "input X",
                "text Window position",
                "indent",
                "begin_disabled true",
                "end_disabled",
                "unindent",
            ]
        );
    }
}
