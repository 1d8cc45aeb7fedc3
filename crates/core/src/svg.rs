//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use skillspan_protocol::{RenderCommand, TextAlign, ThemeToken};

use crate::pagination::{PageSize, paginate};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );
    push_body(&mut svg, commands, width, height, dark);
    svg.push_str("</svg>");
    svg
}

/// Render the commands once per page, each page showing the next vertical
/// slice of the image scaled to the page width. Page units are millimetres.
pub fn render_svg_pages(
    commands: &[RenderCommand],
    width: f64,
    height: f64,
    dark: bool,
    page: PageSize,
) -> Vec<String> {
    let mut body = String::with_capacity(commands.len() * 160);
    push_body(&mut body, commands, width, height, dark);

    paginate(width, height, page)
        .into_iter()
        .map(|placement| {
            let mut svg = String::with_capacity(body.len() + 400);
            let _ = write!(
                svg,
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {pw} {ph}" width="{pw}mm" height="{ph}mm">"#,
                pw = page.width,
                ph = page.height,
            );
            let _ = write!(
                svg,
                r#"<svg x="0" y="{}" width="{}" height="{}" viewBox="0 0 {width} {height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
                placement.offset_y, placement.image_width, placement.image_height,
            );
            svg.push_str(&body);
            svg.push_str("</svg></svg>");
            svg
        })
        .collect()
}

fn push_body(svg: &mut String, commands: &[RenderCommand], width: f64, height: f64, dark: bool) {
    let bg = resolve_color(ThemeToken::Background, dark);
    let _ = write!(svg, r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#);

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                block_id,
            } => {
                let fill = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="4""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, resolve_color(*border, dark));
                }
                if let Some(id) = block_id {
                    let _ = write!(svg, r#" data-block-id="{}""#, escape_xml(id));
                }
                svg.push('>');
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
                svg.push_str("</rect>");

                // Label inside the bar if it is wide enough
                if let Some(label) = label
                    && rect.w > 30.0
                {
                    let text_color = resolve_color(ThemeToken::BlockText, dark);
                    let tx = rect.x + 6.0;
                    let ty = rect.y + rect.h * 0.65;
                    let max_chars = (rect.w / 7.0) as usize;
                    let text = if label.chars().count() > max_chars && max_chars > 2 {
                        let truncated: String = label.chars().take(max_chars - 1).collect();
                        format!("{truncated}…")
                    } else {
                        label.to_string()
                    };
                    let _ = write!(
                        svg,
                        r#"<text x="{tx}" y="{ty}" fill="{text_color}" font-size="12" style="pointer-events:none">{}</text>"#,
                        escape_xml(&text),
                    );
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                );
            }
            RenderCommand::BeginGroup { id, .. } => {
                let _ = write!(svg, r#"<g id="{}">"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    match token {
        ThemeToken::BlockBlue => "#60a5fa",
        ThemeToken::BlockGreen => "#4ade80",
        ThemeToken::BlockPurple => "#c084fc",
        ThemeToken::BlockRed => "#f87171",
        ThemeToken::BlockYellow => "#facc15",
        ThemeToken::BlockTeal => "#2dd4bf",
        ThemeToken::BlockIndigo => "#818cf8",
        ThemeToken::SelectionRing => "#f97316",
        ThemeToken::TrashFill => "#ef4444",
        ThemeToken::TrashText => "#ffffff",
        _ if dark => match token {
            ThemeToken::Background => "#111827",
            ThemeToken::LaneBackground => "#1f2937",
            ThemeToken::LaneBorder | ThemeToken::BlockBorder => "#374151",
            ThemeToken::LaneLabelBackground | ThemeToken::AxisBackground => "#1f2937",
            ThemeToken::AxisLine | ThemeToken::AxisMinorTick => "#6b7280",
            ThemeToken::AxisMajorTick => "#9ca3af",
            ThemeToken::BlockText => "#111827",
            ThemeToken::TooltipBackground => "#f3f4f6",
            ThemeToken::TooltipText => "#111827",
            _ => "#e5e7eb",
        },
        _ => match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::LaneBackground => "#f9fafb",
            ThemeToken::LaneBorder | ThemeToken::BlockBorder => "#d1d5db",
            ThemeToken::LaneLabelBackground | ThemeToken::AxisBackground => "#f3f4f6",
            ThemeToken::AxisLine | ThemeToken::AxisMinorTick => "#9ca3af",
            ThemeToken::AxisMajorTick => "#4b5563",
            ThemeToken::BlockText => "#1f2937",
            ThemeToken::TooltipBackground => "#1f2937",
            ThemeToken::TooltipText => "#ffffff",
            _ => "#374151",
        },
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
