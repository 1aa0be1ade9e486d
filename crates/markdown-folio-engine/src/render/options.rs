use serde::{Deserialize, Serialize};

/// Choices the renderer leaves to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// What to do with code blocks, code spans and HTML blocks.
    pub code: CodePolicy,
    /// Which tag table header cells use.
    pub header_cells: HeaderCells,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodePolicy {
    /// `<pre><code>` / `<code>` with escaped content; HTML blocks verbatim.
    #[default]
    Emit,
    /// Leave code and HTML blocks out of the output entirely.
    Omit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderCells {
    /// Header cells are `<td>` like body cells.
    #[default]
    Td,
    /// Header cells are `<th>`.
    Th,
}
