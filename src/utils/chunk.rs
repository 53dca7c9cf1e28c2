//! Size-bounded text chunking.
//!
//! Documents larger than the model's context are split into pieces of at most
//! `max_chars` characters. Splits prefer paragraph breaks, then line breaks,
//! then spaces; a single word longer than the bound is cut at character
//! boundaries.

/// Separators tried in order, coarsest first.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Number of characters (Unicode scalar values) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` into chunks of at most `max_chars` characters, in document order.
///
/// Text that already fits (or `max_chars == 0`) is returned as a single chunk,
/// even when empty. Whitespace-only pieces of an oversized text are dropped.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    split_on(text, max_chars, &SEPARATORS)
        .into_iter()
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}

fn split_on(text: &str, max_chars: usize, separators: &[&str]) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let Some((sep, rest)) = separators.split_first() else {
        return hard_split(text, max_chars);
    };
    let sep_len = char_len(sep);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for piece in text.split(sep) {
        let piece_len = char_len(piece);

        if piece_len > max_chars {
            flush(&mut chunks, &mut current, &mut current_len);
            chunks.extend(split_on(piece, max_chars, rest));
            continue;
        }

        let joined_len = if current.is_empty() {
            piece_len
        } else {
            current_len + sep_len + piece_len
        };

        if joined_len <= max_chars {
            if !current.is_empty() {
                current.push_str(sep);
            }
            current.push_str(piece);
            current_len = joined_len;
        } else {
            flush(&mut chunks, &mut current, &mut current_len);
            current.push_str(piece);
            current_len = piece_len;
        }
    }
    flush(&mut chunks, &mut current, &mut current_len);

    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
    *current_len = 0;
}

fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}
