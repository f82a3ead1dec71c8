use std::{env, path::Path};

fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if let Some(ffmpeg_dir) = env::var_os("FFMPEG_DIR") {
        check_ffmpeg_dir(Path::new(&ffmpeg_dir));
        return;
    }

    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        suggest_vcpkg_install();
    }
}

/// ffmpeg-sys-next expects `include/` and `lib/` under FFMPEG_DIR.
fn check_ffmpeg_dir(ffmpeg_dir: &Path) {
    for subdirectory in ["include", "lib"] {
        if !ffmpeg_dir.join(subdirectory).is_dir() {
            println!(
                "cargo:warning=FFMPEG_DIR={} has no {subdirectory}/ directory; linking will likely fail.",
                ffmpeg_dir.display(),
            );
        }
    }
}

fn suggest_vcpkg_install() {
    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=FFMPEG_DIR is not set. Install FFmpeg with vcpkg and point FFMPEG_DIR at it."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let candidate = Path::new(&vcpkg_root).join("installed").join(triplet);
    if candidate.is_dir() {
        println!(
            "cargo:warning=Found FFmpeg under {}; set FFMPEG_DIR to it.",
            candidate.display(),
        );
    }
}
