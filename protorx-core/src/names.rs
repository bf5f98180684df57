//! Name forms derived from fully-qualified schema names.
//!
//! Fully-qualified names start with the root anchor (`.foo.bar.Msg`).
//! Every function here is pure and never fails; a name without any
//! separator is treated as a leaf sitting directly under the root.

/// Separator and root anchor of fully-qualified names.
pub const ROOT_ANCHOR: char = '.';

/// Strip the root anchor: `.foo.bar.Msg` -> `foo.bar.Msg`.
pub fn qualified_name(full_name: &str) -> &str {
    full_name.strip_prefix(ROOT_ANCHOR).unwrap_or(full_name)
}

/// The last path component: `.foo.bar.Msg` -> `Msg`.
pub fn leaf_name(full_name: &str) -> &str {
    match full_name.rfind(ROOT_ANCHOR) {
        Some(idx) => &full_name[idx + 1..],
        None => full_name,
    }
}

/// Name of the plain-data interface: `.foo.bar.Msg` -> `foo.bar.IMsg`.
///
/// # Example
///
/// ```
/// use protorx_core::interface_name;
///
/// assert_eq!(interface_name(".foo.bar.Msg"), "foo.bar.IMsg");
/// assert_eq!(interface_name(".HelloRequest"), "IHelloRequest");
/// ```
pub fn interface_name(full_name: &str) -> String {
    let qualified = qualified_name(full_name);
    match qualified.rfind(ROOT_ANCHOR) {
        Some(idx) => format!("{}I{}", &qualified[..=idx], &qualified[idx + 1..]),
        None => format!("I{}", qualified),
    }
}

/// Wire-level routing key of a method: `.pkg.Svc.Method` -> `/pkg.Svc/Method`.
///
/// # Example
///
/// ```
/// use protorx_core::rpc_path;
///
/// assert_eq!(rpc_path(".foo.bar.Svc.Watch"), "/foo.bar.Svc/Watch");
/// assert_eq!(rpc_path(".Greeter.SayHello"), "/Greeter/SayHello");
/// ```
pub fn rpc_path(method_full_name: &str) -> String {
    let qualified = qualified_name(method_full_name);
    match qualified.rfind(ROOT_ANCHOR) {
        Some(idx) => format!("/{}/{}", &qualified[..idx], &qualified[idx + 1..]),
        None => format!("//{}", qualified),
    }
}
