//! Path rendering: applies the template engine to every segment of a
//! `/`-separated path template.
//!
//! A segment gates the whole path when it is a single section
//! (`{{#flag}}name{{/flag}}`) or starts with a section that is never closed
//! inside the segment (`{{#flag}}name`). A closed gate excludes the path and,
//! through it, everything below that directory.

use log::debug;

use crate::constants::PATH_SEPARATOR;
use crate::context::Environment;
use crate::error::{Error, Result};
use crate::parser::{Delimiters, Node, Span};
use crate::renderer::SectionRenderer;

/// Renders `template` segment by segment.
///
/// # Returns
/// * `Ok(Some(path))` - the rendered, `/`-joined path
/// * `Ok(None)` - a gated segment excluded the path
///
/// # Errors
/// * `Error::EmptyPathSegmentError` if a component renders empty
/// * `Error::InvalidPathSegmentError` if a component renders to `.` or `..`
/// * any parse or missing-variable error of a segment
pub fn render_path(
    renderer: &SectionRenderer,
    template: &str,
    env: &Environment,
) -> Result<Option<String>> {
    let segments = split_segments(template, renderer.parser().delimiters());
    let mut components = Vec::new();

    for (index, segment) in segments.into_iter().enumerate() {
        let Some(rendered) = render_segment(renderer, template, segment, env)? else {
            debug!("Path '{template}' excluded by segment {index} ('{segment}')");
            return Ok(None);
        };

        // A single segment may expand into several components, e.g. `com/example`.
        for component in rendered.split(PATH_SEPARATOR) {
            match component {
                "" => {
                    return Err(Error::EmptyPathSegmentError {
                        template: template.to_string(),
                        index,
                    })
                }
                "." | ".." => {
                    return Err(Error::InvalidPathSegmentError {
                        template: template.to_string(),
                        segment: component.to_string(),
                    })
                }
                _ => components.push(component.to_string()),
            }
        }
    }

    Ok(Some(components.join(&PATH_SEPARATOR.to_string())))
}

/// Splits on separators outside tags, so `{{/flag}}` stays in one segment.
/// An unterminated tag keeps the rest of the template in the last segment.
fn split_segments<'a>(template: &'a str, delimiters: &Delimiters) -> Vec<&'a str> {
    let (open, close) = (delimiters.open(), delimiters.close());
    let mut segments = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while let Some(c) = template[pos..].chars().next() {
        let rest = &template[pos..];
        if rest.starts_with(open) {
            match rest[open.len()..].find(close) {
                Some(end) => {
                    pos += open.len() + end + close.len();
                    continue;
                }
                None => break,
            }
        }
        if c == PATH_SEPARATOR {
            segments.push(&template[start..pos]);
            start = pos + c.len_utf8();
        }
        pos += c.len_utf8();
    }
    segments.push(&template[start..]);
    segments
}

fn render_segment(
    renderer: &SectionRenderer,
    template: &str,
    segment: &str,
    env: &Environment,
) -> Result<Option<String>> {
    let parser = renderer.parser();

    if let Some(gate) = parser.leading_gate(segment) {
        let parsed = parser.parse(template, gate.rest)?;
        let span = Span { offset: 0, line: 1, column: 1 };
        if !renderer.section_is_open(template, &gate.name, gate.negated, span, env)? {
            return Ok(None);
        }
        return renderer.render_template(&parsed, env).map(Some);
    }

    let parsed = parser.parse(template, segment)?;
    if let [Node::Section { name, negated, span, .. }] = parsed.nodes.as_slice() {
        if !renderer.section_is_open(template, name, *negated, *span, env)? {
            return Ok(None);
        }
    }
    renderer.render_template(&parsed, env).map(Some)
}
