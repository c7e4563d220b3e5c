use std::path::{Path, PathBuf};

/// One recorded stop: the folder that was left and its scroll offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoint {
    pub path: Option<PathBuf>,
    pub scroll_index: usize,
}

/// Back/forward stack of folder checkpoints with a cursor.
///
/// Starts as a single empty checkpoint at cursor 0. Everything past the cursor
/// is dropped on every new forward step.
#[derive(Debug, Clone)]
pub struct HierarchyTransition {
    checkpoints: Vec<Checkpoint>,
    cursor: usize,
}

impl Default for HierarchyTransition {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyTransition {
    pub fn new() -> Self {
        Self { checkpoints: vec![Checkpoint::default()], cursor: 0 }
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// Step back and return the folder recorded at the new position.
    pub fn go_back(&mut self) -> Option<PathBuf> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        self.checkpoints[self.cursor].path.clone()
    }

    /// Record leaving `path` (scrolled to `scroll_index`) for a lower folder.
    ///
    /// Re-entering the folder recorded just behind the cursor is a no-op, so
    /// bouncing between a folder and its child does not pile up checkpoints.
    pub fn go_forward(&mut self, scroll_index: usize, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if self.can_go_back() && self.checkpoints[self.cursor - 1].path.as_deref() == Some(path) {
            return;
        }
        self.checkpoints[self.cursor] = Checkpoint { path: Some(path.to_path_buf()), scroll_index };
        self.cursor += 1;
        self.checkpoints.truncate(self.cursor);
        self.checkpoints.push(Checkpoint::default());
    }

    /// Scroll offset of the current checkpoint.
    pub fn index(&self) -> usize {
        self.checkpoints[self.cursor].scroll_index
    }

    pub fn set_index(&mut self, scroll_index: usize) {
        self.checkpoints[self.cursor].scroll_index = scroll_index;
    }

    /// Forget every scroll offset except the current one.
    pub fn clear_indexes(&mut self) {
        let cursor = self.cursor;
        for (i, checkpoint) in self.checkpoints.iter_mut().enumerate() {
            if i != cursor {
                checkpoint.scroll_index = 0;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }
}
