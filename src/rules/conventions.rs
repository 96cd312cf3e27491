//! Built-in Kotlin convention rules
//!
//! Layering conventions for a coroutine-native hexagonal service: Spring
//! stereotypes stay out of application services, transactions go through the
//! executor, domain models stay pure, and persistence adapters do not hop
//! dispatchers.

use crate::rules::ContentRule;

/// Content rules in evaluation order
pub const CONTENT_RULES: &[ContentRule] = &[
    ContentRule::new(
        "service-annotation",
        r"application[/\\]service[/\\]",
        r"@(Service|Component)\b",
        "@Service/@Component is forbidden in application/service/",
        "declare the bean with @Bean inside a @Configuration class",
    ),
    ContentRule::new(
        "transactional-annotation",
        r"\.kt$",
        r"@Transactional\b",
        "@Transactional is forbidden",
        "use transactionExecutor.execute { } (see CLAUDE.md)",
    ),
    ContentRule::new(
        "suspend-in-domain-model",
        r"domain[/\\]model[/\\]",
        r"\bsuspend\s+fun\b",
        "suspend fun is forbidden in domain/model/",
        "keep domain models pure; do I/O in the port/adapter layers",
    ),
    ContentRule::new(
        "reactive-in-domain",
        r"domain[/\\]",
        r"\b(Mono|Flux)<",
        "Mono/Flux is forbidden in domain/",
        "return from a suspend fun instead (coroutine-native)",
    ),
    ContentRule::new(
        "dispatchers-io-in-persistence",
        r"adapter[/\\]out[/\\]persistence[/\\]",
        r"Dispatchers\.IO\b",
        "Dispatchers.IO is forbidden in adapter/out/persistence/",
        "R2DBC is already non-blocking; withContext(Dispatchers.IO) is unnecessary",
    ),
];
