//! Lists offered by the admin dashboard.

use crate::domain::query::SortDirection;
use crate::domain::resource::{MutationMethod, ResourceSpec, RowActionSpec};
use crate::domain::types::TypeConstraintError;

fn status_action(name: &str, status: &str) -> RowActionSpec {
    RowActionSpec::new(name, MutationMethod::Put)
        .suffix("status")
        .body_field("status", status)
}

pub fn users() -> Result<ResourceSpec, TypeConstraintError> {
    Ok(ResourceSpec::new("users", "/admin/users")
        .filter("role", &["user", "seller", "admin"])?
        .filter("status", &["active", "suspended", "banned"])?
        .filter("verified", &["true", "false"])?
        .filter("featured", &["true", "false"])?
        .sortable(&["createdAt", "username", "followersCount"])?
        .default_sort("createdAt", SortDirection::Desc)?
        .action(RowActionSpec::new("verify", MutationMethod::Put).suffix("verify"))
        .action(RowActionSpec::new("feature", MutationMethod::Put).suffix("feature"))
        .action(RowActionSpec::new("make-seller", MutationMethod::Put).suffix("make-seller"))
        .action(status_action("ban", "banned").with_reason())
        .action(status_action("suspend", "suspended").with_reason())
        .action(status_action("activate", "active")))
}

pub fn products() -> Result<ResourceSpec, TypeConstraintError> {
    Ok(ResourceSpec::new("products", "/products")
        .filter("status", &["draft", "active", "inactive", "out_of_stock"])?
        .filter("category", &[])?
        .sortable(&["createdAt", "price", "title"])?
        .action(RowActionSpec::new("feature", MutationMethod::Put).suffix("feature"))
        .action(status_action("deactivate", "inactive")))
}

pub fn orders() -> Result<ResourceSpec, TypeConstraintError> {
    Ok(ResourceSpec::new("orders", "/orders")
        .mutation_endpoint("/admin/orders")
        .filter(
            "status",
            &[
                "pending",
                "confirmed",
                "processing",
                "shipped",
                "delivered",
                "cancelled",
            ],
        )?
        .filter("paymentStatus", &["pending", "paid", "failed", "refunded"])?
        .sortable(&["createdAt", "total"])?
        .default_sort("createdAt", SortDirection::Desc)?
        .action(RowActionSpec::new("cancel", MutationMethod::Post).suffix("cancel").with_reason())
        .action(RowActionSpec::new("refund", MutationMethod::Post).suffix("refund").with_reason()))
}

pub fn payments() -> Result<ResourceSpec, TypeConstraintError> {
    Ok(ResourceSpec::new("payments", "/payments")
        .collection_alias("transactions")
        .filter("status", &["pending", "completed", "failed", "refunded"])?
        .filter("method", &[])?
        .sortable(&["createdAt", "amount"])?
        .default_sort("createdAt", SortDirection::Desc)?)
}

pub fn comments() -> Result<ResourceSpec, TypeConstraintError> {
    Ok(ResourceSpec::new("comments", "/admin/comments")
        .filter("status", &["pending", "approved", "reported", "blocked"])?
        .action(RowActionSpec::new("approve", MutationMethod::Patch).body_field("action", "approve"))
        .action(RowActionSpec::new("block", MutationMethod::Patch).body_field("action", "block")))
}

pub fn content() -> Result<ResourceSpec, TypeConstraintError> {
    Ok(ResourceSpec::new("content", "/content")
        .mutation_endpoint("/admin/content")
        .filter("type", &["video", "post", "story"])?
        .filter("status", &["pending", "approved", "rejected"])?
        .action(RowActionSpec::new("approve", MutationMethod::Post).suffix("approve"))
        .action(RowActionSpec::new("reject", MutationMethod::Post).suffix("reject").with_reason()))
}

pub fn stores() -> Result<ResourceSpec, TypeConstraintError> {
    Ok(ResourceSpec::new("stores", "/stores")
        .filter("status", &["active", "pending", "suspended"])?
        .sortable(&["createdAt", "storeName"])?
        .action(status_action("approve", "active"))
        .action(status_action("suspend", "suspended").with_reason()))
}

pub fn transactions() -> Result<ResourceSpec, TypeConstraintError> {
    Ok(ResourceSpec::new("transactions", "/transactions")
        .filter("type", &[])?
        .without_search())
}

/// Every list, in navigation order.
pub fn all() -> Result<Vec<ResourceSpec>, TypeConstraintError> {
    Ok(vec![
        users()?,
        products()?,
        orders()?,
        payments()?,
        comments()?,
        content()?,
        stores()?,
        transactions()?,
    ])
}

/// Looks a list up by name.
pub fn find(name: &str) -> Result<Option<ResourceSpec>, TypeConstraintError> {
    Ok(all()?.into_iter().find(|resource| resource.name == name))
}
