//! Compiles the variadic `numa_warn` hook when libnuma is linked.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=csrc/numa_warn.c");

    let numa = env::var_os("CARGO_FEATURE_NUMA").is_some();
    let frontend = env::var_os("CARGO_FEATURE_FRONTEND").is_some();
    let linux = env::var("CARGO_CFG_TARGET_OS").map(|os| os == "linux").unwrap_or(false);

    if numa && linux && !frontend {
        cc::Build::new()
            .file("csrc/numa_warn.c")
            .warnings(true)
            .cargo_metadata(false)
            .compile("numaport_hooks");

        // libnuma defines its own numa_warn, so a plain static link would never
        // pull the override out of the archive.
        let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
        println!("cargo:rustc-link-search=native={}", out_dir);
        println!("cargo:rustc-link-lib=static:+whole-archive=numaport_hooks");
    }
}
