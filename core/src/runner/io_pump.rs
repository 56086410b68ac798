use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::error::RunnerError;
use crate::style::Renderer;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpStats {
    pub lines: u64,
    pub suppressed: u64,
    pub bytes: u64,
}

/// Render `rd` into `wr` line by line until EOF.
pub fn pump<R, W>(
    mut rd: R,
    mut wr: W,
    renderer: Arc<Renderer>,
) -> JoinHandle<Result<PumpStats, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; 16 * 1024];
        let mut stats = PumpStats::default();
        let mut line_buf: Vec<u8> = Vec::with_capacity(8 * 1024);

        loop {
            let n = rd.read(&mut buf).await.map_err(|e| RunnerError::StreamIo {
                stream: "output",
                source: e,
            })?;
            if n == 0 {
                break;
            }
            stats.bytes += n as u64;

            line_buf.extend_from_slice(&buf[..n]);
            while let Some(pos) = line_buf.iter().position(|&b| b == b'\n') {
                let mut one = line_buf.drain(..=pos).collect::<Vec<u8>>();
                trim_newline(&mut one);
                emit(&mut wr, &renderer, &one, &mut stats).await?;
            }
        }

        // EOF flush: deliver the last partial line if it doesn't end with '\n'.
        if !line_buf.is_empty() {
            trim_newline(&mut line_buf);
            emit(&mut wr, &renderer, &line_buf, &mut stats).await?;
        }

        Ok(stats)
    })
}

async fn emit<W>(
    wr: &mut W,
    renderer: &Renderer,
    raw: &[u8],
    stats: &mut PumpStats,
) -> Result<(), RunnerError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    stats.lines += 1;
    let line = String::from_utf8_lossy(raw);
    let Some(mut rendered) = renderer.render(&line) else {
        stats.suppressed += 1;
        return Ok(());
    };
    rendered.push('\n');

    let stdout_err = |e| RunnerError::StreamIo {
        stream: "stdout",
        source: e,
    };
    wr.write_all(rendered.as_bytes()).await.map_err(stdout_err)?;
    wr.flush().await.map_err(stdout_err)
}

fn trim_newline(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
}
