use super::{linux_syscall, raw_page_size};

#[test]
fn test_raw_page_size() {
    assert!(raw_page_size() > 0);
}

#[test]
fn test_sysconf_invalid_name() {
    let e = linux_syscall::sysconf(-1).unwrap_err();
    assert_eq!(e.raw_os_error(), Some(libc::EINVAL));
}
