//! Code fence tracking for line-based block extensions.
//!
//! Block extension fences (`:::repo`) inside fenced code are literal text, so
//! the block pass asks the tracker before claiming a line.

/// An open fence: the marker character and its run length.
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

/// Tracks whether the current line is inside a fenced code block.
///
/// A closing fence must use the opening marker, be at least as long, and
/// carry nothing but trailing whitespace.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        match self.open {
            Some(fence) => {
                let run = marker_run(trimmed, fence.marker);
                let closes =
                    run >= fence.len && trimmed[run..].chars().all(char::is_whitespace);
                if closes {
                    self.open = None;
                }
                closes
            }
            None => match opening_fence(trimmed) {
                Some(fence) => {
                    self.open = Some(fence);
                    true
                }
                None => false,
            },
        }
    }
}

fn opening_fence(trimmed: &str) -> Option<Fence> {
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = marker_run(trimmed, marker);
    (len >= 3).then_some(Fence { marker, len })
}

// Marker characters are ASCII, so the count is also a byte offset.
fn marker_run(s: &str, marker: char) -> usize {
    s.chars().take_while(|&c| c == marker).count()
}
