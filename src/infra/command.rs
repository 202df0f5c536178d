//! # Command Execution Module / 命令执行模块
//!
//! Parses the configured interpreter command line and runs child processes,
//! capturing standard output and standard error as separate byte streams.
//!
//! 解析配置的解释器命令行并运行子进程，
//! 将标准输出和标准错误分别捕获为独立的字节流。

use anyhow::{Context, Result, anyhow, bail};
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

use crate::infra::t;

/// Everything a finished child process left behind.
/// 子进程结束后留下的全部内容。
#[derive(Debug)]
pub struct CapturedOutput {
    /// The exit status, or the error raised while waiting for it.
    /// 退出状态，或等待时产生的错误。
    pub status: io::Result<ExitStatus>,
    /// Raw standard output. / 原始标准输出。
    pub stdout: Vec<u8>,
    /// Raw standard error. / 原始标准错误。
    pub stderr: Vec<u8>,
}

/// Expands `~` and environment variables in a command line, then splits it
/// with shell quoting rules into a program and its arguments.
///
/// 展开命令行中的 `~` 和环境变量，然后按 shell 引号规则拆分为程序和参数。
pub fn parse_command_line(command: &str) -> Result<(String, Vec<String>)> {
    let expanded = shellexpand::full(command)
        .with_context(|| format!("Failed to expand command: {command}"))?
        .to_string();

    let mut parts = shlex::split(&expanded)
        .ok_or_else(|| anyhow!("Failed to parse command: {}", expanded))?;

    if parts.is_empty() {
        bail!("Empty command after parsing.");
    }

    let program = parts.remove(0);
    Ok((program, parts))
}

/// Decodes captured bytes as UTF-8. Invalid sequences are replaced with
/// U+FFFD; the flag reports whether that happened.
///
/// 将捕获的字节解码为 UTF-8。无效序列会被替换为 U+FFFD，
/// 返回的标志表示是否发生了替换。
pub fn decode_utf8(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), false),
        Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
    }
}

/// Spawns a command and captures its stdout and stderr separately.
/// Both streams are drained concurrently so neither pipe can fill up and
/// stall the child. Stdin is closed.
///
/// On unix the child leads a new process group. Once it exits, anything it
/// left running in that group is killed before the pipes are drained, and
/// dropping the returned future (timeout, cancellation) kills the whole
/// group as well.
///
/// An `Err` means the process could not be spawned at all.
///
/// 派生一个命令并分别捕获其 stdout 和 stderr。
/// 两个输出流被并发读取，避免任一管道写满导致子进程阻塞。stdin 被关闭。
///
/// 在 unix 上子进程会成为新进程组的组长。子进程退出后，该组中残留的进程
/// 会在读取管道前被终止；丢弃返回的 future（超时、取消）同样会终止整个进程组。
///
/// 返回 `Err` 表示进程根本无法启动。
pub async fn spawn_and_capture(mut cmd: tokio::process::Command) -> io::Result<CapturedOutput> {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.as_std_mut().process_group(0);
    }

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    #[cfg(unix)]
    let mut group = ProcessGroupGuard::new(child.id());

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other(t!("command.capture_stdout_failed").to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other(t!("command.capture_stderr_failed").to_string()))?;

    let stdout_handle = tokio::spawn(read_stream(stdout));
    let stderr_handle = tokio::spawn(read_stream(stderr));

    // Wait for the process to exit.
    // 等待进程退出。
    let status = child.wait().await;

    // Stragglers would otherwise hold the pipes open.
    #[cfg(unix)]
    group.kill();

    let stdout = join_stream(stdout_handle, "stdout").await;
    let stderr = join_stream(stderr_handle, "stderr").await;

    Ok(CapturedOutput {
        status,
        stdout,
        stderr,
    })
}

/// Kills a child's process group, at the latest when dropped.
/// 终止子进程所在的进程组，最迟在被丢弃时执行。
#[cfg(unix)]
struct ProcessGroupGuard {
    pgid: Option<libc::pid_t>,
}

#[cfg(unix)]
impl ProcessGroupGuard {
    fn new(pid: Option<u32>) -> Self {
        Self {
            pgid: pid.and_then(|pid| libc::pid_t::try_from(pid).ok()),
        }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            // SAFETY: `killpg` only sends a signal; an already empty group yields ESRCH.
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
}

#[cfg(unix)]
impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

async fn read_stream<R: AsyncRead + Unpin>(mut reader: R) -> Vec<u8> {
    let mut buffer = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buffer).await {
        eprintln!("{}", t!("command.read_stream_failed", error = e));
    }
    buffer
}

async fn join_stream(handle: JoinHandle<Vec<u8>>, name: &str) -> Vec<u8> {
    match handle.await {
        Ok(buffer) => buffer,
        Err(e) => {
            eprintln!("Failed to join {} task: {}", name, e);
            Vec::new()
        }
    }
}
