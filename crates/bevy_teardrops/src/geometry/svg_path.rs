use bevy::math::Vec2;
use thiserror::Error;

use super::{Contour, PathSegment};

/// Errors produced while reading SVG path data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvgPathError {
    /// A character that is neither a command, a number nor a separator.
    #[error("unexpected character '{character}' at byte {offset}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset into the path data.
        offset: usize,
    },
    /// A drawing command appeared before any `M`/`m`.
    #[error("path data must start with a moveto command")]
    MissingMoveTo,
    /// A command ran out of numeric arguments.
    #[error("command '{command}' expects more numbers at byte {offset}")]
    ExpectedNumber {
        /// The command being read.
        command: char,
        /// Byte offset where a number was expected.
        offset: usize,
    },
    /// Elliptical arcs and other commands outside of the supported set.
    #[error("unsupported path command '{0}'")]
    UnsupportedCommand(char),
}

struct Cursor<'a> {
    data: &'a str,
    offset: usize,
}

impl Cursor<'_> {
    fn skip_separators(&mut self) {
        let rest = &self.data[self.offset..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        self.offset += rest.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_separators();
        self.data[self.offset..].chars().next()
    }

    fn starts_number(&mut self) -> bool {
        matches!(self.peek(), Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
    }

    fn number(&mut self, command: char) -> Result<f32, SvgPathError> {
        self.skip_separators();
        let bytes = self.data.as_bytes();
        let start = self.offset;
        let mut end = start;
        let mut seen_dot = false;
        let mut seen_exponent = false;

        if end < bytes.len() && matches!(bytes[end], b'-' | b'+') {
            end += 1;
        }
        while end < bytes.len() {
            match bytes[end] {
                b'0'..=b'9' => end += 1,
                b'.' if !seen_dot && !seen_exponent => {
                    seen_dot = true;
                    end += 1;
                }
                b'e' | b'E' if !seen_exponent && end > start => {
                    seen_exponent = true;
                    end += 1;
                    if end < bytes.len() && matches!(bytes[end], b'-' | b'+') {
                        end += 1;
                    }
                }
                _ => break,
            }
        }

        let value = self.data[start..end]
            .parse::<f32>()
            .map_err(|_| SvgPathError::ExpectedNumber {
                command,
                offset: start,
            })?;
        self.offset = end;
        Ok(value)
    }

    fn point(&mut self, command: char) -> Result<Vec2, SvgPathError> {
        let x = self.number(command)?;
        let y = self.number(command)?;
        Ok(Vec2::new(x, y))
    }
}

#[derive(Clone, Copy)]
enum Smooth {
    Cubic(Vec2),
    Quadratic(Vec2),
}

#[derive(Default)]
struct Builder {
    contours: Vec<Contour>,
    current: Option<Contour>,
    cursor: Vec2,
    smooth: Option<Smooth>,
}

impl Builder {
    fn move_to(&mut self, point: Vec2) {
        self.finish();
        self.current = Some(Contour::new(point));
        self.cursor = point;
    }

    fn push(&mut self, segment: PathSegment) -> Result<(), SvgPathError> {
        if self.current.is_none() {
            // drawing after `z` starts a new subpath at the previous start
            if self.contours.is_empty() {
                return Err(SvgPathError::MissingMoveTo);
            }
            self.current = Some(Contour::new(self.cursor));
        }
        if let Some(contour) = self.current.as_mut() {
            contour.segments.push(segment);
        }
        self.cursor = segment.end();
        Ok(())
    }

    fn close(&mut self) -> Result<(), SvgPathError> {
        let Some(mut contour) = self.current.take() else {
            return if self.contours.is_empty() {
                Err(SvgPathError::MissingMoveTo)
            } else {
                Ok(())
            };
        };
        contour.closed = true;
        self.cursor = contour.start;
        self.contours.push(contour);
        Ok(())
    }

    fn reflected_cubic(&self) -> Vec2 {
        match self.smooth {
            Some(Smooth::Cubic(ctrl)) => 2.0 * self.cursor - ctrl,
            _ => self.cursor,
        }
    }

    fn reflected_quadratic(&self) -> Vec2 {
        match self.smooth {
            Some(Smooth::Quadratic(ctrl)) => 2.0 * self.cursor - ctrl,
            _ => self.cursor,
        }
    }

    fn finish(&mut self) {
        if let Some(contour) = self.current.take() {
            self.contours.push(contour);
        }
    }
}

pub(super) fn parse(data: &str) -> Result<Vec<Contour>, SvgPathError> {
    let mut cursor = Cursor { data, offset: 0 };
    let mut builder = Builder::default();
    let mut command: Option<char> = None;

    while let Some(next) = cursor.peek() {
        let current = if next.is_ascii_alphabetic() {
            cursor.offset += next.len_utf8();
            next
        } else if cursor.starts_number() {
            // implicit repetition; a repeated moveto continues as lineto
            match command {
                Some('M') => 'L',
                Some('m') => 'l',
                Some('Z' | 'z') => {
                    return Err(SvgPathError::UnexpectedCharacter {
                        character: next,
                        offset: cursor.offset,
                    });
                }
                Some(previous) => previous,
                None => return Err(SvgPathError::MissingMoveTo),
            }
        } else {
            return Err(SvgPathError::UnexpectedCharacter {
                character: next,
                offset: cursor.offset,
            });
        };

        let origin = if current.is_ascii_lowercase() {
            builder.cursor
        } else {
            Vec2::ZERO
        };

        let smooth = match current.to_ascii_uppercase() {
            'M' => {
                let point = origin + cursor.point(current)?;
                builder.move_to(point);
                None
            }
            'L' => {
                let to = origin + cursor.point(current)?;
                builder.push(PathSegment::Line(to))?;
                None
            }
            'H' => {
                let x = cursor.number(current)? + origin.x;
                let to = Vec2::new(x, builder.cursor.y);
                builder.push(PathSegment::Line(to))?;
                None
            }
            'V' => {
                let y = cursor.number(current)? + origin.y;
                let to = Vec2::new(builder.cursor.x, y);
                builder.push(PathSegment::Line(to))?;
                None
            }
            'C' => {
                let ctrl1 = origin + cursor.point(current)?;
                let ctrl2 = origin + cursor.point(current)?;
                let to = origin + cursor.point(current)?;
                builder.push(PathSegment::Cubic { ctrl1, ctrl2, to })?;
                Some(Smooth::Cubic(ctrl2))
            }
            'S' => {
                let ctrl1 = builder.reflected_cubic();
                let ctrl2 = origin + cursor.point(current)?;
                let to = origin + cursor.point(current)?;
                builder.push(PathSegment::Cubic { ctrl1, ctrl2, to })?;
                Some(Smooth::Cubic(ctrl2))
            }
            'Q' => {
                let ctrl = origin + cursor.point(current)?;
                let to = origin + cursor.point(current)?;
                builder.push(PathSegment::Quadratic { ctrl, to })?;
                Some(Smooth::Quadratic(ctrl))
            }
            'T' => {
                let ctrl = builder.reflected_quadratic();
                let to = origin + cursor.point(current)?;
                builder.push(PathSegment::Quadratic { ctrl, to })?;
                Some(Smooth::Quadratic(ctrl))
            }
            'Z' => {
                builder.close()?;
                None
            }
            _ => return Err(SvgPathError::UnsupportedCommand(current)),
        };

        builder.smooth = smooth;
        command = Some(current);
    }

    builder.finish();
    Ok(builder.contours)
}
