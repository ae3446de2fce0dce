use maud::{html, Markup};

pub mod error;
pub mod listing_table;
pub mod scatter;

pub use error::{error_banner, error_page};
pub use listing_table::listing_table;
pub use scatter::scatter_chart;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}
