use crate::domain::model::Delivery;
use crate::domain::ports::MessageSender;
use crate::utils::error::{BriefError, Result};
use crate::utils::retry::RetryPolicy;

/// An HTML tag left open at the current position.
#[derive(Debug, Clone)]
struct OpenTag {
    name: String,
    opening: String,
}

impl OpenTag {
    fn closing(&self) -> String {
        format!("</{}>", self.name)
    }
}

enum Piece<'a> {
    Tag(&'a str),
    /// One character or one `&...;` entity
    Text(&'a str),
}

const MAX_ENTITY_CHARS: usize = 10;

/// Tags without a closing counterpart.
const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "wbr"];

fn entity_len(rest: &str) -> Option<usize> {
    let (end, _) = rest
        .char_indices()
        .skip(1)
        .take(MAX_ENTITY_CHARS)
        .find(|(_, c)| *c == ';')?;
    rest[1..end]
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '#')
        .then_some(end + 1)
}

/// Breaks a line into whole `<...>` tags, entities and single characters.
fn pieces(line: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = line;
    while let Some(c) = rest.chars().next() {
        let len = match c {
            '<' => rest.find('>').map(|end| end + 1),
            '&' => entity_len(rest),
            _ => None,
        };
        match (c, len) {
            ('<', Some(len)) => pieces.push(Piece::Tag(&rest[..len])),
            (_, Some(len)) => pieces.push(Piece::Text(&rest[..len])),
            (_, None) => pieces.push(Piece::Text(&rest[..c.len_utf8()])),
        }
        rest = &rest[len.unwrap_or(c.len_utf8())..];
    }
    pieces
}

/// Applies an opening or closing tag to the stack of open tags.
fn apply_tag(open: &mut Vec<OpenTag>, tag: &str) {
    let inner = tag.trim_start_matches('<').trim_end_matches('>');
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() || inner.ends_with('/') || VOID_TAGS.contains(&name.as_str()) {
        return;
    }

    if closing {
        if let Some(index) = open.iter().rposition(|t| t.name == name) {
            open.truncate(index);
        }
    } else {
        open.push(OpenTag {
            name,
            opening: tag.to_string(),
        });
    }
}

fn closing_len(open: &[OpenTag]) -> usize {
    open.iter().map(|t| t.closing().chars().count()).sum()
}

/// Builds chunks that each parse as standalone HTML: tags still open at a
/// boundary are closed at the end of the chunk and reopened in the next one.
struct Chunker {
    max_chars: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
    /// Length of the reopened tags at the start of `current`
    prefix_len: usize,
    open: Vec<OpenTag>,
}

impl Chunker {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
            prefix_len: 0,
            open: Vec::new(),
        }
    }

    fn has_body(&self) -> bool {
        self.current_len > self.prefix_len
    }

    fn fits(&self, len: usize, open_after: &[OpenTag]) -> bool {
        self.current_len + len + closing_len(open_after) <= self.max_chars
    }

    fn flush(&mut self) {
        if !self.has_body() {
            return;
        }
        let mut chunk = std::mem::take(&mut self.current);
        for tag in self.open.iter().rev() {
            chunk.push_str(&tag.closing());
        }
        self.chunks.push(chunk);

        self.current = self.open.iter().map(|t| t.opening.as_str()).collect();
        self.current_len = self.current.chars().count();
        self.prefix_len = self.current_len;
    }

    fn push_str(&mut self, text: &str, len: usize) {
        self.current.push_str(text);
        self.current_len += len;
    }

    fn push_line(&mut self, line: &str) {
        let line_len = line.chars().count();
        let pieces = pieces(line);

        let mut open_after = self.open.clone();
        for piece in &pieces {
            if let Piece::Tag(tag) = piece {
                apply_tag(&mut open_after, tag);
            }
        }

        if !self.fits(line_len, &open_after) {
            self.flush();
        }
        if self.fits(line_len, &open_after) {
            self.push_str(line, line_len);
            self.open = open_after;
            return;
        }

        // 單行超過上限：逐個標籤或字元切開，不拆開標籤本身
        for piece in pieces {
            match piece {
                Piece::Tag(tag) => {
                    let mut open_after = self.open.clone();
                    apply_tag(&mut open_after, tag);
                    let len = tag.chars().count();
                    if !self.fits(len, &open_after) {
                        self.flush();
                    }
                    self.push_str(tag, len);
                    self.open = open_after;
                }
                Piece::Text(text) => {
                    let len = text.chars().count();
                    if !self.fits(len, &self.open) {
                        self.flush();
                    }
                    self.push_str(text, len);
                }
            }
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

/// Splits `text` into chunks of at most `max_chars` characters. Breaks on line
/// boundaries where possible and never inside a tag; every chunk has its tags
/// balanced.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunker = Chunker::new(max_chars);
    for line in text.split_inclusive('\n') {
        chunker.push_line(line);
    }

    chunker
        .finish()
        .into_iter()
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}

/// Sends the brief, chunk by chunk, retrying transient failures.
pub async fn deliver(
    sender: &dyn MessageSender,
    text: &str,
    max_chars: usize,
    retry: &RetryPolicy,
) -> Result<Delivery> {
    if text.trim().is_empty() {
        return Err(BriefError::DeliveryError {
            attempts: 0,
            message: "refusing to send an empty message".to_string(),
        });
    }

    let chunks = split_message(text, max_chars);
    if chunks.len() > 1 {
        tracing::info!("✂️ Brief split into {} messages", chunks.len());
    }

    let mut delivery = Delivery::default();
    for (index, chunk) in chunks.iter().enumerate() {
        let label = format!("sendMessage {}/{}", index + 1, chunks.len());
        let (result, attempts) = retry.run(&label, move || sender.send_message(chunk)).await;
        delivery.attempts += attempts;

        match result {
            Ok(message_id) => delivery.message_ids.push(message_id),
            Err(e) => {
                return Err(BriefError::DeliveryError {
                    attempts: delivery.attempts,
                    message: format!(
                        "{} ({} of {} messages sent)",
                        e,
                        delivery.messages_sent(),
                        chunks.len()
                    ),
                })
            }
        }
    }

    Ok(delivery)
}
