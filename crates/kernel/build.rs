use std::path::PathBuf;
use std::{env, fs};

static LINKER: &[u8] = include_bytes!("./linker.ld");

fn main() {
    println!("cargo::rerun-if-changed=linker.ld");

    // Host builds (tests) link normally.
    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() != Ok("riscv64") {
        return;
    }

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let ld_path = out_dir.join("kernel.x");
    fs::write(&ld_path, LINKER).unwrap();
    println!("cargo::rustc-link-arg-bins=-T{}", ld_path.display());
}
