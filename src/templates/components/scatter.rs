// Minimal SVG scatter plot: x and y positions, optional color and size
// encodings. Rows missing x or y are not drawn.
use crate::domain::browse::BrowsableListing;
use crate::domain::chart::{ChartSpec, ChartVariable};
use maud::{html, Markup};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;
const MARGIN: f64 = 48.0;
const DEFAULT_RADIUS: f64 = 5.0;
const MIN_RADIUS: f64 = 3.0;
const MAX_RADIUS: f64 = 14.0;

#[derive(Debug, Clone, Copy)]
struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    fn of(rows: &[&BrowsableListing], var: ChartVariable) -> Option<Self> {
        rows.iter().filter_map(|r| var.value(r)).fold(None, |acc, v| match acc {
            None => Some(Extent { min: v, max: v }),
            Some(e) => Some(Extent {
                min: e.min.min(v),
                max: e.max.max(v),
            }),
        })
    }

    /// 0.0..=1.0; a flat extent maps to the middle.
    fn unit(&self, v: f64) -> f64 {
        if self.max > self.min {
            (v - self.min) / (self.max - self.min)
        } else {
            0.5
        }
    }
}

fn encoded(var: Option<ChartVariable>, rows: &[&BrowsableListing]) -> Option<(ChartVariable, Extent)> {
    let var = var?;
    Extent::of(rows, var).map(|e| (var, e))
}

/// Blue (low) to red (high).
fn color_for(t: f64) -> String {
    let hue = 240.0 * (1.0 - t.clamp(0.0, 1.0));
    format!("hsl({hue:.0}, 70%, 50%)")
}

pub fn scatter_chart(spec: &ChartSpec, rows: &[&BrowsableListing]) -> Markup {
    let (Some(xe), Some(ye)) = (Extent::of(rows, spec.x), Extent::of(rows, spec.y)) else {
        return html! { p class="muted" { "表示できるデータがありません" } };
    };
    let color = encoded(spec.color, rows);
    let size = encoded(spec.size, rows);

    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;

    html! {
        figure class="chart" {
            svg xmlns="http://www.w3.org/2000/svg"
                viewBox=(format!("0 0 {WIDTH} {HEIGHT}"))
                width=(WIDTH) height=(HEIGHT)
            {
                line x1=(MARGIN) y1=(HEIGHT - MARGIN) x2=(WIDTH - MARGIN) y2=(HEIGHT - MARGIN) stroke="#888" {}
                line x1=(MARGIN) y1=(MARGIN) x2=(MARGIN) y2=(HEIGHT - MARGIN) stroke="#888" {}

                text x=(WIDTH / 2.0) y=(HEIGHT - 8.0) text-anchor="middle" { (spec.x.label()) }
                text x="12" y=(HEIGHT / 2.0) text-anchor="middle"
                    transform=(format!("rotate(-90 12 {})", HEIGHT / 2.0)) { (spec.y.label()) }

                text x=(MARGIN) y=(HEIGHT - MARGIN + 16.0) text-anchor="start" { (xe.min) }
                text x=(WIDTH - MARGIN) y=(HEIGHT - MARGIN + 16.0) text-anchor="end" { (xe.max) }
                text x=(MARGIN - 4.0) y=(HEIGHT - MARGIN) text-anchor="end" { (ye.min) }
                text x=(MARGIN - 4.0) y=(MARGIN) text-anchor="end" { (ye.max) }

                @for row in rows {
                    @if let (Some(x), Some(y)) = (spec.x.value(row), spec.y.value(row)) {
                        @let cx = MARGIN + xe.unit(x) * plot_w;
                        @let cy = HEIGHT - MARGIN - ye.unit(y) * plot_h;
                        @let fill = color
                            .and_then(|(var, e)| var.value(row).map(|v| color_for(e.unit(v))))
                            .unwrap_or_else(|| "#524ed2".to_string());
                        @let r = size
                            .and_then(|(var, e)| var.value(row).map(|v| MIN_RADIUS + e.unit(v) * (MAX_RADIUS - MIN_RADIUS)))
                            .unwrap_or(DEFAULT_RADIUS);
                        circle cx=(format!("{cx:.1}")) cy=(format!("{cy:.1}")) r=(format!("{r:.1}"))
                            fill=(fill) fill-opacity="0.7"
                        {
                            title { "No." (row.no) " " (row.name) " (" (row.district) ")" }
                        }
                    }
                }
            }
            figcaption {
                @if let Some((var, _)) = color {
                    span { "色: " (var.label()) " " }
                }
                @if let Some((var, _)) = size {
                    span { "大きさ: " (var.label()) }
                }
            }
        }
    }
}
