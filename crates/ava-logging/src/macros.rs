//! ---
//! ava_section: "03-logging"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Structured logging context and link event helpers."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
/// Emit an informational log enriched with link context.
#[macro_export]
macro_rules! ava_info {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::INFO,
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::INFO,
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit a debug log enriched with link context.
#[macro_export]
macro_rules! ava_debug {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::DEBUG,
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::DEBUG,
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit a warning log enriched with link context.
#[macro_export]
macro_rules! ava_warn {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::WARN,
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::WARN,
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an error log enriched with link context.
#[macro_export]
macro_rules! ava_error {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::ERROR,
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::ERROR,
            endpoint = ctx.endpoint.unwrap_or(""),
            variant = ctx.variant.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            attempt = ctx.attempt.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
}
