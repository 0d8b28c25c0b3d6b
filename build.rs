use std::path::{Path, PathBuf};
use std::process::Command;
use std::{env, fs};

fn main() {
    let hash = git_describe().unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=OVERMARK_GIT_HASH={hash}");

    if let Some(git_dir) = git_dir() {
        for watched in ["HEAD", "refs", "packed-refs", "index"] {
            rerun_if_exists(&git_dir.join(watched));
        }
    }
}

/// Short commit hash, suffixed with `-dirty` for uncommitted changes.
fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=9"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let described = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!described.is_empty()).then_some(described)
}

fn git_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("GIT_DIR") {
        return Some(PathBuf::from(dir));
    }

    let dot_git = PathBuf::from(".git");
    if dot_git.is_dir() {
        return Some(dot_git);
    }

    // Worktrees and submodules use a `gitdir:` pointer file
    let pointer = fs::read_to_string(&dot_git).ok()?;
    let target = PathBuf::from(pointer.strip_prefix("gitdir:")?.trim());
    Some(if target.is_relative() {
        dot_git.parent().map(|p| p.join(&target)).unwrap_or(target)
    } else {
        target
    })
}

fn rerun_if_exists(path: &Path) {
    if let Some(display) = path.exists().then(|| path.to_str()).flatten() {
        println!("cargo:rerun-if-changed={display}");
    }
}
