/// Presentation layer: the HTML page and the Plotly figures it renders.
pub mod panels;
pub mod plot;
