//! Landing page, compiled into the binary.

pub const INDEX_HTML: &str = include_str!("../../static/index.html");
