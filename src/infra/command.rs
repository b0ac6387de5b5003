use std::ffi::{OsStr, OsString};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Exit status plus the combined stdout/stderr transcript of a finished
/// subprocess.
///
/// 已结束子进程的退出状态及合并的 stdout/stderr 记录。
pub struct CaptureResult {
    pub status: std::process::ExitStatus,
    pub output: String,
}

/// Spawns a command and waits for it to exit, capturing stdout and stderr
/// into a single transcript. Both streams are read concurrently so neither
/// pipe can fill up and stall the child; lines land in arrival order.
///
/// 派生一个命令并等待其退出，将 stdout 和 stderr 捕获到一份记录中。
/// 两个流被并发读取，因此任何一个管道都不会被填满而使子进程停滞；
/// 行按到达顺序记录。
pub async fn capture(mut cmd: tokio::process::Command) -> std::io::Result<CaptureResult> {
    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stderr"))?;

    let transcript = Arc::new(tokio::sync::Mutex::new(String::new()));
    let stdout_task = tokio::spawn(append_lines(stdout, Arc::clone(&transcript)));
    let stderr_task = tokio::spawn(append_lines(stderr, Arc::clone(&transcript)));

    let status = child.wait().await?;

    // Join the readers so the transcript is complete before it is returned.
    let _ = stdout_task.await;
    let _ = stderr_task.await;

    let output = transcript.lock().await.clone();
    Ok(CaptureResult { status, output })
}

async fn append_lines<R>(reader: R, transcript: Arc<tokio::sync::Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let mut transcript = transcript.lock().await;
        transcript.push_str(&line);
        transcript.push('\n');
    }
}

/// Renders a program and its argument list as a copy-pastable shell command
/// line, quoting words where needed.
///
/// 将程序及其参数列表渲染为可直接复制粘贴的 shell 命令行，必要时加引号。
pub fn render(program: &OsStr, args: &[OsString]) -> String {
    let words: Vec<String> = std::iter::once(program)
        .chain(args.iter().map(OsString::as_os_str))
        .map(|word| word.to_string_lossy().into_owned())
        .collect();

    shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
}
