//! JSONL transcript writer.
//!
//! Every [`ConversationEvent`] becomes one line: the payload's fields plus
//! `type`, `timestamp` and the `session` the logger was opened for.

use chrono::{SecondsFormat, Utc};
use datachat_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Appends conversation events to a `.jsonl` file.
///
/// Safe to share between concurrent requests; writes are serialized and
/// flushed per line.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    session: String,
}

impl JsonlConversationLogger {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl AsRef<Path>, session: impl Into<String>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!("Writing conversation transcript to {}", path.display());

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            session: session.into(),
        })
    }

    /// Start a new transcript under `dir`, named after the current time.
    pub fn in_dir(dir: impl AsRef<Path>) -> io::Result<Self> {
        let session = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let path = dir
            .as_ref()
            .join(format!("datachat-{}.conversation.jsonl", session));
        Self::open(path, session)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&self, event: ConversationEvent) -> Value {
        let mut map = match event.payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::from(event.event_type));
        map.insert(
            "timestamp".to_string(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        map.insert("session".to_string(), Value::from(self.session.as_str()));
        Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let line = match serde_json::to_string(&self.record(event)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize conversation event: {}", e);
                return;
            }
        };

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!("Could not write to {}: {}", self.path.display(), e);
        }
    }
}
