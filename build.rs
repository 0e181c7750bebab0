use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let hash = command_stdout("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".into());
    let tree = match command_stdout("git", &["status", "--porcelain"]) {
        Some(status) if status.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let rustc = command_stdout("rustc", &["--version"]).unwrap_or_else(|| "unknown".into());
    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    emit("BALLET_CORE_BUILD_HASH", &hash);
    emit("BALLET_CORE_BUILD_STATUS", tree);
    emit("BALLET_CORE_BUILD_TIMESTAMP", &built_at);
    emit("BALLET_CORE_BUILD_TARGET", &env_or("TARGET", "unknown-target"));
    emit("BALLET_CORE_BUILD_PROFILE", &env_or("PROFILE", "unknown-profile"));
    emit("BALLET_CORE_BUILD_RUSTC", &rustc);
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={key}={value}");
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
