//! Fetch, extract and classify: the work behind one orders request.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::info;

use crate::classifier::{ClassifierError, OrderClassifier};
use crate::forum::PostFetcher;
use crate::orders::{extract_orders, Order, OrderForm};

/// An order as exposed by the API. Replies are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderEntry {
    #[serde(flatten)]
    pub form: OrderForm,
    pub post_index: usize,
}

impl From<Order> for OrderEntry {
    fn from(order: Order) -> Self {
        Self {
            form: order.form,
            post_index: order.post_index,
        }
    }
}

/// Orders partitioned by verdict, each list in thread order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    pub uncompleted: Vec<OrderEntry>,
    pub completed: Vec<OrderEntry>,
}

/// Classify every order and partition them by verdict.
///
/// At most `concurrency` classifications run at once; results keep the
/// input order. The first failure aborts the batch.
///
/// # Errors
///
/// Returns the first classifier error.
pub async fn classify_orders(
    orders: Vec<Order>,
    classifier: &Arc<dyn OrderClassifier>,
    concurrency: usize,
) -> Result<OrderReport, ClassifierError> {
    let verdicts: Vec<(Order, bool)> = stream::iter(orders)
        .map(|order| {
            let classifier = Arc::clone(classifier);
            async move {
                let completed = classifier.classify(&order).await?;
                Ok::<_, ClassifierError>((order, completed))
            }
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let mut report = OrderReport::default();
    for (order, completed) in verdicts {
        if completed {
            report.completed.push(order.into());
        } else {
            report.uncompleted.push(order.into());
        }
    }
    Ok(report)
}

/// Build the full order report for the configured forum thread.
///
/// # Errors
///
/// Returns an error if the thread cannot be fetched or any order cannot be
/// classified. No partial report is produced.
pub async fn build_report(
    fetcher: &PostFetcher,
    classifier: &Arc<dyn OrderClassifier>,
    concurrency: usize,
) -> Result<OrderReport> {
    let posts = fetcher
        .fetch_all_posts()
        .await
        .context("Failed to fetch forum posts")?;
    let orders = extract_orders(&posts);

    let report = classify_orders(orders, classifier, concurrency)
        .await
        .context("Failed to classify orders")?;

    info!(
        completed = report.completed.len(),
        uncompleted = report.uncompleted.len(),
        "Built order report"
    );

    Ok(report)
}
