use crate::config::FileRotation;
use crate::logger::LoggerError;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;

/// Destination for formatted log lines.
///
/// A [`Logger`](crate::logger::Logger) formats each record once and hands
/// the line to every sink whose level admits it. Implementations are called
/// on the logging thread and should write synchronously.
pub trait LogSink: Send + Sync {
    /// Write one line. The line carries no trailing newline.
    ///
    /// **Returns**
    /// - `Ok(())` if the line was accepted.
    /// - `Err(..)` if the destination failed. The logger reports the error
    ///   on stderr and carries on with the remaining sinks; log calls never
    ///   fail because of a sink.
    fn write_line(&self, line: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush buffered output, if the destination buffers.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// Sink writing newline-terminated lines through a [`MakeWriter`].
///
/// Backs both the console sink ([`WriterSink::stdout`]) and the rotating
/// file sink ([`rolling_file`]). Each line goes out in a single
/// `write_all`, so lines from concurrent callers do not interleave.
#[derive(Debug)]
pub struct WriterSink<W> {
    make_writer: W,
}

impl<W> WriterSink<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync,
{
    pub fn new(make_writer: W) -> Self {
        Self { make_writer }
    }
}

impl WriterSink<fn() -> io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout as fn() -> io::Stdout)
    }
}

impl WriterSink<fn() -> io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr as fn() -> io::Stderr)
    }
}

impl<W> LogSink for WriterSink<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync,
{
    fn write_line(&self, line: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut writer = self.make_writer.make_writer();
        writer.write_all(buf.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.make_writer.make_writer().flush()?;
        Ok(())
    }
}

/// Build a file sink rotating per `rotation` and keeping at most
/// `max_log_files` files.
///
/// `path` is split into directory, file stem and extension: `logs/api.log`
/// rotating daily writes `logs/api.2024-05-01.log`; with
/// [`FileRotation::Never`] it writes `logs/api.log` itself. The directory is
/// created if missing.
pub fn rolling_file(
    path: &Path,
    rotation: FileRotation,
    max_log_files: Option<usize>,
) -> Result<WriterSink<RollingFileAppender>, LoggerError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut builder = RollingFileAppender::builder().rotation(rotation.into());
    if let Some(stem) = path.file_stem() {
        builder = builder.filename_prefix(stem.to_string_lossy().into_owned());
    }
    if let Some(ext) = path.extension() {
        builder = builder.filename_suffix(ext.to_string_lossy().into_owned());
    }
    if let Some(max) = max_log_files.filter(|max| *max > 0) {
        builder = builder.max_log_files(max);
    }

    let appender = builder.build(dir)?;
    Ok(WriterSink::new(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuf {
        type Writer = SharedBuf;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn writer_sink_terminates_lines() {
        let buf = SharedBuf::default();
        let sink = WriterSink::new(buf.clone());

        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "first\nsecond\n");
    }

    #[test]
    fn console_sinks_accept_lines() {
        WriterSink::stdout().write_line("console sink test line").unwrap();
        WriterSink::stderr().write_line("console sink test line").unwrap();
        WriterSink::stderr().flush().unwrap();
    }

    #[test]
    fn rolling_file_without_rotation_uses_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("api.log");

        let sink = rolling_file(&path, FileRotation::Never, None).unwrap();
        sink.write_line("hello").unwrap();
        sink.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn rolling_file_daily_keeps_stem_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.log");

        let sink = rolling_file(&path, FileRotation::Daily, Some(3)).unwrap();
        sink.write_line("hello").unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("api."));
        assert!(names[0].ends_with(".log"));
    }
}
