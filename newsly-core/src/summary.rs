use crate::types::FeaturedItem;

/// Which summary a detail view shows, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryBody<'a> {
    Long(&'a str),
    Points(&'a [String]),
    Description(&'a str),
}

impl FeaturedItem {
    pub fn summary_body(&self) -> SummaryBody<'_> {
        if let Some(long) = self.long_summary.as_deref().filter(|s| !s.trim().is_empty()) {
            return SummaryBody::Long(long);
        }
        match self.full_summary.as_deref() {
            Some(points) if !points.is_empty() => SummaryBody::Points(points),
            _ => SummaryBody::Description(&self.description),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryBlock {
    Lead(String),
    Paragraph(String),
    Bullet(String),
}

fn bullet_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-').or_else(|| line.strip_prefix('•'))?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Splits after a period that is followed by a space and an uppercase letter.
fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut parts = Vec::new();
    let mut start = 0;

    for i in 0..chars.len() {
        let (idx, ch) = chars[i];
        if ch != '.' {
            continue;
        }
        if let (Some(&(_, ' ')), Some(&(next_idx, next))) = (chars.get(i + 1), chars.get(i + 2)) {
            if next.is_uppercase() && idx + 1 > start {
                parts.push(text[start..idx + 1].trim());
                start = next_idx;
            }
        }
    }
    parts.push(text[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn flush_prose(prose: &mut String, blocks: &mut Vec<SummaryBlock>) {
    for sentence in split_sentences(prose) {
        if blocks.is_empty() {
            blocks.push(SummaryBlock::Lead(sentence.to_string()));
        } else {
            blocks.push(SummaryBlock::Paragraph(sentence.to_string()));
        }
    }
    prose.clear();
}

/// Lays out a long-form summary as a lead sentence, paragraphs and bullets.
pub fn format_long_summary(text: &str) -> Vec<SummaryBlock> {
    let mut blocks = Vec::new();
    let mut prose = String::new();

    for line in text.lines() {
        let line = line.trim();
        if let Some(item) = bullet_text(line) {
            flush_prose(&mut prose, &mut blocks);
            if !item.is_empty() {
                blocks.push(SummaryBlock::Bullet(item.to_string()));
            }
        } else if !line.is_empty() {
            if !prose.is_empty() {
                prose.push(' ');
            }
            prose.push_str(line);
        }
    }
    flush_prose(&mut prose, &mut blocks);
    blocks
}
