//! Remote Host File System
//!
//! Implements the HostFs port with POSIX shell commands sent through a
//! `RemoteExecutor`. Directory listing, link sweeping and atomic link swaps
//! rely on GNU `find` and `mv -T`, which every supported platform ships.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::domain::ports::{
    quote_path, shell_quote, DirInfo, FsError, FsResult, HostFs, RemoteCommand, RemoteExecutor,
    SyncSpec, TransferStats,
};
use crate::infrastructure::sync::{parse_itemized, spec_flags};

use super::local::temp_link_name;

pub struct RemoteHostFs {
    exec: Arc<dyn RemoteExecutor>,
    privileged: bool,
}

impl RemoteHostFs {
    pub fn new(exec: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            exec,
            privileged: false,
        }
    }

    /// Run every command through sudo
    pub fn privileged(mut self, privileged: bool) -> Self {
        self.privileged = privileged;
        self
    }

    fn command(&self, line: String) -> RemoteCommand {
        let cmd = RemoteCommand::new(line);
        if self.privileged {
            cmd.privileged()
        } else {
            cmd
        }
    }

    fn run(&self, line: String) -> FsResult<String> {
        Ok(self.exec.run(&self.command(line))?.stdout)
    }

    fn probe(&self, line: String) -> bool {
        self.exec
            .run(&self.command(line).warn_only())
            .map(|out| out.success())
            .unwrap_or(false)
    }
}

/// Parse a `find -printf '%T@ %f\n'` line
pub(crate) fn parse_dir_line(line: &str) -> Option<DirInfo> {
    let (stamp, name) = line.split_once(' ')?;
    let (secs, frac) = stamp.split_once('.').unwrap_or((stamp, "0"));
    let secs: u64 = secs.parse().ok()?;
    let mut digits: String = frac.chars().take(9).collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    let nanos: u32 = digits.parse().ok()?;
    Some(DirInfo {
        name: name.to_string(),
        modified: UNIX_EPOCH + Duration::new(secs, nanos),
    })
}

impl HostFs for RemoteHostFs {
    fn host(&self) -> &str {
        self.exec.host()
    }

    fn exists(&self, path: &Path) -> bool {
        self.probe(format!("test -e {}", quote_path(path)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.probe(format!("test -d {}", quote_path(path)))
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        self.run(format!("mkdir -p {}", quote_path(path)))?;
        Ok(())
    }

    fn create_dir_exclusive(&self, path: &Path) -> FsResult<bool> {
        let p = quote_path(path);
        let parent = path
            .parent()
            .map(quote_path)
            .unwrap_or_else(|| "/".to_string());
        let out = self.run(format!(
            "mkdir -p {parent} && if mkdir {p} 2>/dev/null; then echo created; elif [ -d {p} ]; then echo exists; else echo failed; fi"
        ))?;
        match out.trim() {
            "created" => Ok(true),
            "exists" => Ok(false),
            other => Err(FsError::Parse(format!(
                "mkdir {} reported '{}'",
                path.display(),
                other
            ))),
        }
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> FsResult<()> {
        let src = format!("{}/.", src.display().to_string().trim_end_matches('/'));
        // no -p: a new release takes the copy time, which retention orders by
        self.run(format!(
            "mkdir -p {dst} && cp -R {src} {dst}/",
            dst = quote_path(dst),
            src = shell_quote(&src),
        ))?;
        Ok(())
    }

    fn sync_tree(&self, src: &Path, dst: &Path, spec: &SyncSpec) -> FsResult<TransferStats> {
        let flags: Vec<String> = spec_flags(spec).iter().map(|f| shell_quote(f)).collect();
        let src = format!("{}/", src.display().to_string().trim_end_matches('/'));
        let dst = format!("{}/", dst.display().to_string().trim_end_matches('/'));
        let out = self.run(format!(
            "rsync {} {} {}",
            flags.join(" "),
            shell_quote(&src),
            shell_quote(&dst)
        ))?;
        Ok(parse_itemized(&out))
    }

    fn list_dirs(&self, path: &Path) -> FsResult<Vec<DirInfo>> {
        let p = quote_path(path);
        let out = self.run(format!(
            "[ -d {p} ] || exit 0; find {p} -mindepth 1 -maxdepth 1 -type d -printf '%T@ %f\\n'"
        ))?;
        let mut dirs = Vec::new();
        for line in out.lines().filter(|l| !l.trim().is_empty()) {
            let info = parse_dir_line(line)
                .ok_or_else(|| FsError::Parse(format!("bad find output: {line}")))?;
            dirs.push(info);
        }
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dirs)
    }

    fn remove_dir_all(&self, path: &Path) -> FsResult<()> {
        self.run(format!("rm -rf {}", quote_path(path)))?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> FsResult<()> {
        self.run(format!("rm -f {}", quote_path(path)))?;
        Ok(())
    }

    fn read_link(&self, path: &Path) -> FsResult<Option<PathBuf>> {
        let p = quote_path(path);
        let out = self.run(format!("if [ -L {p} ]; then readlink {p}; fi"))?;
        let target = out.trim_end_matches('\n');
        if target.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(target)))
        }
    }

    fn replace_symlink(&self, target: &Path, link: &Path) -> FsResult<()> {
        let tmp = temp_link_name(link);
        let parent = link
            .parent()
            .map(quote_path)
            .unwrap_or_else(|| ".".to_string());
        self.run(format!(
            "mkdir -p {parent} && ln -sfn {target} {tmp} && mv -Tf {tmp} {link}",
            target = quote_path(target),
            tmp = quote_path(&tmp),
            link = quote_path(link),
        ))?;
        Ok(())
    }

    fn remove_dangling_links(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let d = quote_path(dir);
        // with -L, `-type l` only matches links whose target is missing
        let out = self.run(format!(
            "[ -d {d} ] || exit 0; find -L {d} -mindepth 1 -maxdepth 1 -type l -print -exec rm -f {{}} \\;"
        ))?;
        let mut removed: Vec<PathBuf> = out
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(PathBuf::from)
            .collect();
        removed.sort();
        Ok(removed)
    }

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        self.run(format!("cat {}", quote_path(path)))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        let p = quote_path(path);
        let tmp = shell_quote(&format!("{}.tmp", path.display()));
        let parent = path
            .parent()
            .map(quote_path)
            .unwrap_or_else(|| ".".to_string());
        let cmd = self.command(format!("mkdir -p {parent} && cat > {tmp} && mv -f {tmp} {p}"));
        self.exec.run_with_input(&cmd, Some(content))?;
        Ok(())
    }

    fn append(&self, path: &Path, content: &str) -> FsResult<()> {
        let parent = path
            .parent()
            .map(quote_path)
            .unwrap_or_else(|| ".".to_string());
        let cmd = self.command(format!(
            "mkdir -p {parent} && cat >> {}",
            quote_path(path)
        ));
        self.exec.run_with_input(&cmd, Some(content))?;
        Ok(())
    }

    fn modified(&self, path: &Path) -> FsResult<SystemTime> {
        let p = quote_path(path);
        let out = self.run(format!("stat -c %Y {p} 2>/dev/null || stat -f %m {p}"))?;
        let secs: u64 = out
            .trim()
            .parse()
            .map_err(|_| FsError::Parse(format!("bad stat output: {}", out.trim())))?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs))
    }
}
