use crate::config::ServerConfig;

/// G1 tuning applied to every server, ahead of any custom flags.
pub const DEFAULT_JVM_FLAGS: &[&str] = &[
    "-XX:+UseG1GC",
    "-XX:+ParallelRefProcEnabled",
    "-XX:MaxGCPauseMillis=200",
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+DisableExplicitGC",
    "-XX:+AlwaysPreTouch",
    "-XX:G1NewSizePercent=30",
    "-XX:G1MaxNewSizePercent=40",
    "-XX:G1HeapRegionSize=8M",
    "-XX:G1ReservePercent=20",
    "-XX:G1HeapWastePercent=5",
    "-XX:G1MixedGCCountTarget=4",
    "-XX:InitiatingHeapOccupancyPercent=15",
    "-XX:G1MixedGCLiveThresholdPercent=90",
    "-XX:G1RSetUpdatingPauseTimePercent=5",
    "-XX:SurvivorRatio=32",
    "-XX:+PerfDisableSharedMem",
    "-XX:MaxTenuringThreshold=1",
];

/// Builds the JVM argument list.
///
/// Order is heap sizing, default tuning, custom flags, entry arguments.
/// Nothing is deduplicated: a custom flag repeating a default overrides it
/// through the JVM's last-one-wins handling.
pub fn build_jvm_args(
    min_heap_mb: u32,
    max_heap_mb: u32,
    custom_flags: &[String],
    entry_args: &[String],
) -> Vec<String> {
    let mut args =
        Vec::with_capacity(2 + DEFAULT_JVM_FLAGS.len() + custom_flags.len() + entry_args.len());

    args.push(format!("-Xms{}M", min_heap_mb));
    args.push(format!("-Xmx{}M", max_heap_mb));
    args.extend(DEFAULT_JVM_FLAGS.iter().map(|f| f.to_string()));
    args.extend(custom_flags.iter().cloned());
    args.extend(entry_args.iter().cloned());

    args
}

/// Entry-point arguments for a server: `-jar <artifact>` plus server args.
pub fn entry_args_for(config: &ServerConfig) -> Vec<String> {
    let mut args = vec!["-jar".to_string(), config.entry_artifact.clone()];
    args.extend(config.server_args.iter().cloned());
    args
}

/// Full argument list for a configured server.
pub fn jvm_args_for(config: &ServerConfig) -> Vec<String> {
    build_jvm_args(
        config.min_heap_mb,
        config.max_heap_mb,
        &config.custom_flags,
        &entry_args_for(config),
    )
}
