pub mod cargo_env {
    pub const CARGO_PKG_NAME: &'static str = env!("CARGO_PKG_NAME");
}

pub mod common {
    pub const DEFAULT_TERMINAL_WIDTH: usize = 80;
}
