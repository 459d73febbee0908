//! Line-oriented markup used in news article bodies.

/// One rendered line of article content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading2(&'a str),
    Heading3(&'a str),
    Quote(&'a str),
    ListItem(&'a str),
    Paragraph(&'a str),
}

impl<'a> Block<'a> {
    /// Classify a single line. Blank lines produce nothing.
    pub fn parse_line(line: &'a str) -> Option<Self> {
        let line = line.trim_end_matches('\r');
        if let Some(text) = line.strip_prefix("## ") {
            Some(Block::Heading2(text))
        } else if let Some(text) = line.strip_prefix("### ") {
            Some(Block::Heading3(text))
        } else if let Some(text) = line.strip_prefix("> ") {
            Some(Block::Quote(text))
        } else if let Some(text) = line.strip_prefix("- ") {
            Some(Block::ListItem(text))
        } else if line.trim().is_empty() {
            None
        } else {
            Some(Block::Paragraph(line))
        }
    }

    pub fn text(&self) -> &'a str {
        match self {
            Block::Heading2(text)
            | Block::Heading3(text)
            | Block::Quote(text)
            | Block::ListItem(text)
            | Block::Paragraph(text) => text,
        }
    }
}

/// Split article content into blocks, one per non-blank line.
pub fn parse(content: &str) -> Vec<Block<'_>> {
    content.split('\n').filter_map(Block::parse_line).collect()
}
