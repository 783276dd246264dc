use crate::model::{LayoutPoint, LegendSymbol, MapLayout, MarkerKind};
use std::fmt::Write as _;

pub const OBSTRUCTION_FILL: &str = "#808080";
pub const OBSTRUCTION_OPACITY: f64 = 0.7;
pub const DWELLING_FILL: &str = "#8b4513";
pub const LANDMARK_FILL: &str = "#2e8b57";
pub const OTHER_FILL: &str = "#800080";
pub const PATH_STROKE: &str = "#e31a1c";

const MAP_CSS: &str = "text{font-family:Arial,Helvetica,sans-serif;fill:#333;}\
.title{font-size:18px;font-weight:bold;}\
.tick{font-size:10px;}\
.legend-label{font-size:12px;}";

pub(crate) fn render_map_layout_svg(layout: &MapLayout, diagram_id: &str) -> String {
    let id = escape_xml(diagram_id);
    let b = &layout.bounds;
    let vb_w = b.width().max(1.0);
    let vb_h = b.height().max(1.0);
    let cs = layout.cell_size;

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}" style="background-color: white;" role="graphics-document document" aria-roledescription="areamap">"#,
        x = fmt(b.min_x),
        y = fmt(b.min_y),
        w = fmt(vb_w),
        h = fmt(vb_h),
    );
    let _ = write!(&mut out, "<style>{MAP_CSS}</style>");

    let _ = write!(
        &mut out,
        r#"<text class="title" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
        fmt(layout.title_x),
        fmt(layout.title_y),
        escape_xml(&layout.title)
    );

    if !layout.region_tiles.is_empty() {
        out.push_str(r#"<g class="regions">"#);
        for tile in &layout.region_tiles {
            let _ = write!(
                &mut out,
                r#"<rect x="{}" y="{}" width="{s}" height="{s}" fill="{}"/>"#,
                fmt(tile.x),
                fmt(tile.y),
                escape_xml(&tile.fill),
                s = fmt(tile.size),
            );
        }
        out.push_str("</g>");
    }

    let left = layout.origin.x;
    let top = layout.origin.y;
    let right = left + f64::from(layout.columns) * cs;
    let bottom = top + f64::from(layout.rows) * cs;

    out.push_str(r##"<g class="grid" stroke="#d0d0d0" stroke-width="0.5">"##);
    for i in 0..=layout.columns {
        let x = left + f64::from(i) * cs;
        let _ = write!(
            &mut out,
            r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}"/>"#,
            fmt(top),
            fmt(bottom),
            x = fmt(x)
        );
    }
    for i in 0..=layout.rows {
        let y = top + f64::from(i) * cs;
        let _ = write!(
            &mut out,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}"/>"#,
            fmt(left),
            fmt(right),
            y = fmt(y)
        );
    }
    out.push_str("</g>");
    let _ = write!(
        &mut out,
        r##"<rect class="frame" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#999999"/>"##,
        fmt(left),
        fmt(top),
        fmt(right - left),
        fmt(bottom - top)
    );

    out.push_str(r#"<g class="ticks">"#);
    for t in &layout.x_ticks {
        let _ = write!(
            &mut out,
            r#"<text class="tick" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            fmt(t.x),
            fmt(t.y),
            t.value
        );
    }
    for t in &layout.y_ticks {
        let _ = write!(
            &mut out,
            r#"<text class="tick" x="{}" y="{}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            fmt(t.x),
            fmt(t.y),
            t.value
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="markers">"#);
    for m in &layout.markers {
        write_marker(&mut out, m.kind, m.center, cs);
    }
    out.push_str("</g>");

    if !layout.path.is_empty() {
        write_path(&mut out, &layout.path, cs);
    }

    if !layout.legend_items.is_empty() {
        let swatch = 16.0;
        out.push_str(r#"<g class="legend">"#);
        for item in &layout.legend_items {
            let c = LayoutPoint {
                x: layout.legend_x + swatch / 2.0,
                y: item.y,
            };
            match &item.symbol {
                LegendSymbol::Marker(kind) => write_marker(&mut out, *kind, c, swatch),
                LegendSymbol::PathLine => {
                    let _ = write!(
                        &mut out,
                        r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{PATH_STROKE}" stroke-width="2"/>"#,
                        fmt(layout.legend_x),
                        fmt(layout.legend_x + swatch),
                        y = fmt(item.y)
                    );
                }
            }
            let _ = write!(
                &mut out,
                r#"<text class="legend-label" x="{}" y="{}" dominant-baseline="middle">{}</text>"#,
                fmt(layout.legend_x + swatch + 8.0),
                fmt(item.y),
                escape_xml(&item.label)
            );
        }
        out.push_str("</g>");
    }

    out.push_str("</svg>");
    out
}

/// Draws one marker centred on `c`, sized relative to a cell of side `cs`.
fn write_marker(out: &mut String, kind: MarkerKind, c: LayoutPoint, cs: f64) {
    match kind {
        MarkerKind::Obstruction => {
            let _ = write!(
                out,
                r#"<rect class="marker obstruction" x="{}" y="{}" width="{s}" height="{s}" fill="{OBSTRUCTION_FILL}" fill-opacity="{}"/>"#,
                fmt(c.x - cs / 2.0),
                fmt(c.y - cs / 2.0),
                fmt(OBSTRUCTION_OPACITY),
                s = fmt(cs),
            );
        }
        MarkerKind::Dwelling => {
            let _ = write!(
                out,
                r#"<circle class="marker dwelling" cx="{}" cy="{}" r="{}" fill="{DWELLING_FILL}"/>"#,
                fmt(c.x),
                fmt(c.y),
                fmt(cs * 0.35)
            );
        }
        MarkerKind::Destination => {
            let h = cs * 0.4;
            let _ = write!(
                out,
                r#"<rect class="marker destination" x="{}" y="{}" width="{s}" height="{s}" fill="{LANDMARK_FILL}"/>"#,
                fmt(c.x - h),
                fmt(c.y - h),
                s = fmt(h * 2.0),
            );
        }
        MarkerKind::Home => {
            let h = cs * 0.4;
            let _ = write!(
                out,
                r#"<polygon class="marker home" points="{},{} {},{} {},{}" fill="{LANDMARK_FILL}"/>"#,
                fmt(c.x),
                fmt(c.y - h),
                fmt(c.x + h),
                fmt(c.y + h),
                fmt(c.x - h),
                fmt(c.y + h)
            );
        }
        MarkerKind::Other => {
            let h = cs * 0.35;
            let _ = write!(
                out,
                r#"<polygon class="marker other" points="{},{} {},{} {},{} {},{}" fill="{OTHER_FILL}"/>"#,
                fmt(c.x),
                fmt(c.y - h),
                fmt(c.x + h),
                fmt(c.y),
                fmt(c.x),
                fmt(c.y + h),
                fmt(c.x - h),
                fmt(c.y)
            );
        }
    }
}

fn write_path(out: &mut String, points: &[LayoutPoint], cs: f64) {
    out.push_str(r#"<g class="path">"#);
    out.push_str(r#"<polyline points=""#);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", fmt(p.x), fmt(p.y));
    }
    let _ = write!(
        out,
        r#"" fill="none" stroke="{PATH_STROKE}" stroke-width="{}" stroke-linejoin="round"/>"#,
        fmt((cs * 0.08).max(1.0))
    );
    let r = fmt((cs * 0.1).max(1.5));
    for p in points {
        let _ = write!(
            out,
            r#"<circle cx="{}" cy="{}" r="{r}" fill="{PATH_STROKE}"/>"#,
            fmt(p.x),
            fmt(p.y)
        );
    }
    out.push_str("</g>");
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.3}", v);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_trims_trailing_zeros() {
        assert_eq!(fmt(12.0), "12");
        assert_eq!(fmt(12.5), "12.5");
        assert_eq!(fmt(1.23456), "1.235");
        assert_eq!(fmt(-0.0001), "0");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn escape_xml_covers_markup_characters() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
