//! Export operations for rendered turn results.
//!
//! Both exports operate on already-rendered DOM regions identified by the
//! turn id (`data-table-{id}`, `chart-container-{id}`) and silently
//! return when the region is absent. The artifact builders themselves
//! ([`excel::build_workbook`], [`pdf::build_chart_pdf`]) are pure over
//! the scraped data and tested natively; only the DOM scraping and the
//! blob download are browser-specific.

pub mod excel;
pub mod pdf;

pub use excel::{build_workbook, TableData};
pub use pdf::build_chart_pdf;

use dioxus::logger::tracing::{info, warn};

use crate::chat::TurnId;
use crate::error::ExportError;

const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PDF_MIME: &str = "application/pdf";

/// Serialize the rendered results table for a turn into an xlsx download.
/// No-op if the table region is not in the DOM.
pub async fn export_table_excel(turn_id: TurnId) {
    let Some(data) = table_data_from_dom(turn_id) else {
        return;
    };

    let outcome = build_workbook(&data)
        .and_then(|bytes| download_bytes(&bytes, XLSX_MIME, &format!("table-{}.xlsx", turn_id)));

    match outcome {
        Ok(()) => info!("Exported table for turn {} ({} rows)", turn_id, data.rows.len()),
        Err(e) => warn!("Table export failed for turn {}: {}", turn_id, e),
    }
}

/// Render the chart region for a turn into a landscape PDF download.
/// No-op if the chart region is not in the DOM.
pub async fn export_chart_pdf(turn_id: TurnId) {
    let Some(src) = chart_image_src(turn_id) else {
        return;
    };

    let outcome = match fetch_image_bytes(&src).await {
        Ok(png) => build_chart_pdf(&png, "Chart Visualization").and_then(|bytes| {
            download_bytes(&bytes, PDF_MIME, &format!("chart-{}.pdf", turn_id))
        }),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => info!("Exported chart for turn {}", turn_id),
        Err(e) => warn!("Chart export failed for turn {}: {}", turn_id, e),
    }
}

// ============================================================================
// Browser glue (DOM scraping + blob download)
// ============================================================================

/// Scrape the rendered table for a turn into headers plus body rows.
#[cfg(target_arch = "wasm32")]
pub fn table_data_from_dom(turn_id: TurnId) -> Option<TableData> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let table = document.get_element_by_id(&format!("data-table-{}", turn_id))?;

    let rows = table.query_selector_all("tr").ok()?;
    let mut data = TableData::default();

    for row_idx in 0..rows.length() {
        let Some(row) = rows.get(row_idx).and_then(|n| n.dyn_into::<web_sys::Element>().ok())
        else {
            continue;
        };
        let cells = row.query_selector_all("th,td").ok()?;
        let mut texts = Vec::with_capacity(cells.length() as usize);
        for cell_idx in 0..cells.length() {
            let text = cells
                .get(cell_idx)
                .and_then(|n| n.text_content())
                .unwrap_or_default();
            texts.push(text.trim().to_string());
        }

        if row_idx == 0 {
            data.headers = texts;
        } else {
            data.rows.push(texts);
        }
    }

    (!data.is_empty()).then_some(data)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn table_data_from_dom(_turn_id: TurnId) -> Option<TableData> {
    None
}

/// Resolve the chart image URL inside a turn's chart region.
#[cfg(target_arch = "wasm32")]
pub fn chart_image_src(turn_id: TurnId) -> Option<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let container = document.get_element_by_id(&format!("chart-container-{}", turn_id))?;
    let image = container
        .query_selector("img")
        .ok()
        .flatten()?
        .dyn_into::<web_sys::HtmlImageElement>()
        .ok()?;
    Some(image.src())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn chart_image_src(_turn_id: TurnId) -> Option<String> {
    None
}

/// Fetch the chart image bytes.
#[cfg(target_arch = "wasm32")]
async fn fetch_image_bytes(src: &str) -> Result<Vec<u8>, ExportError> {
    let response = gloo_net::http::Request::get(src)
        .send()
        .await
        .map_err(|e| ExportError::ChartFetch(e.to_string()))?;
    if !response.ok() {
        return Err(ExportError::ChartFetch(format!(
            "HTTP {} fetching chart image",
            response.status()
        )));
    }
    response
        .binary()
        .await
        .map_err(|e| ExportError::ChartFetch(e.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_image_bytes(_src: &str) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::ChartFetch("no browser".to_string()))
}

/// Hand artifact bytes to the browser as a named download.
#[cfg(target_arch = "wasm32")]
fn download_bytes(bytes: &[u8], mime: &str, filename: &str) -> Result<(), ExportError> {
    use wasm_bindgen::JsCast;

    let download_err = |e: wasm_bindgen::JsValue| ExportError::Download(format!("{:?}", e));

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob =
        web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(download_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(download_err)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ExportError::Download("no document".to_string()))?;
    let anchor = document
        .create_element("a")
        .map_err(download_err)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(download_err)?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    web_sys::Url::revoke_object_url(&url).map_err(download_err)?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn download_bytes(_bytes: &[u8], _mime: &str, _filename: &str) -> Result<(), ExportError> {
    Err(ExportError::Download("no browser".to_string()))
}
