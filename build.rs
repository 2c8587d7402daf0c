use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // Board defaults, overridable at build time

    // Number of active outputs (1-16)
    let outputs = env::var("BRICKPICO_OUTPUTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| (1..=16).contains(n));
    match outputs {
        Some(n) => {
            println!("cargo:rustc-env=BRICKPICO_OUTPUTS={}", n);
            println!("cargo:warning=Using BRICKPICO_OUTPUTS from environment: {}", n);
        }
        None => println!("cargo:rustc-env=BRICKPICO_OUTPUTS=8"),
    }

    // PWM frequency in Hz
    if let Ok(freq) = env::var("BRICKPICO_PWM_FREQ") {
        println!("cargo:rustc-env=BRICKPICO_PWM_FREQ={}", freq);
        println!("cargo:warning=Using BRICKPICO_PWM_FREQ from environment: {}", freq);
    } else {
        println!("cargo:rustc-env=BRICKPICO_PWM_FREQ=1000");
    }

    // Linker script for the firmware target
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
        let out = PathBuf::from(env::var("OUT_DIR").unwrap());
        fs::write(out.join("memory.x"), include_bytes!("memory.x")).unwrap();
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
        println!("cargo:rerun-if-changed=memory.x");
    }

    // Rerun if environment variables change
    println!("cargo:rerun-if-env-changed=BRICKPICO_OUTPUTS");
    println!("cargo:rerun-if-env-changed=BRICKPICO_PWM_FREQ");
}
