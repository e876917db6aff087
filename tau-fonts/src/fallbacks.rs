//! Monospace families tried when no family is configured or the configured
//! one is missing, in priority order.

pub const FALLBACK_FAMILIES: &[&str] = &[
    "Hack",
    "JetBrains Mono",
    "Fira Code",
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Consolas",
    "Menlo",
    "Monaco",
    "Courier New",
];
