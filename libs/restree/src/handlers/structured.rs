use http::StatusCode;
use restree_query::{ChildQuery, Paging};
use serde_json::{Map, Value};

use crate::config::ServeConfig;
use crate::dispatch::DispatchError;
use crate::links::{ITEMS, LinkParams, NAME, as_mapping, hateoas};
use crate::mime::MimeType;
use crate::request::Request;
use crate::resource::{Resource, ResourceRef, is_pageable};
use crate::response::Response;
use crate::writers::{DEFAULT_WRITERS, select_writer};

use super::writer_query;

/// Encoded structured body for `pattern`, or `None` when no writer fits it.
pub(super) fn structured_response(
    resource: &ResourceRef,
    pattern: &MimeType,
    request: &Request,
    config: &ServeConfig,
) -> Result<Option<Response>, DispatchError> {
    let resource_writers = resource.response_writers();
    let Some(writer) = select_writer(
        pattern,
        [
            request.response_writers.as_slice(),
            resource_writers.as_slice(),
            DEFAULT_WRITERS.as_slice(),
        ],
    ) else {
        return Ok(None);
    };

    let body = structured_body(resource.as_ref(), request, config)?;
    let bytes = writer.write(&body, &writer_query(request, config))?;
    Ok(Some(Response::typed(StatusCode::OK, writer.mime(), bytes)))
}

/// Assemble the structured GET body: the resource's own body, its links, and
/// one page of decorated children under `_items`.
///
/// # Errors
/// Malformed paging, filter or order parameters, query limits, and resource failures.
pub fn structured_body(
    resource: &dyn Resource,
    request: &Request,
    config: &ServeConfig,
) -> Result<Value, DispatchError> {
    let paging = Paging::from_query(&request.query)?;
    let decorate = request.flag("hateoas", true);
    let collection = resource.as_collection();

    let body = match resource.as_structured() {
        Some(s) => s.get_structured_body(false)?,
        None => Value::Null,
    };
    let body = if body.is_null() {
        Value::Object(Map::new())
    } else {
        body
    };
    if !decorate && collection.is_none() {
        return Ok(body);
    }

    let mut map = if decorate {
        // paging only shows up in the links of something that can be paged
        let params = if collection.is_some() {
            LinkParams {
                page: paging.page,
                offset: paging.offset,
                count: paging.count,
                default_count: Some(config.default_count),
                pageable: true,
                ..LinkParams::default()
            }
        } else {
            LinkParams::default()
        }
        .carrying(&request.query);
        hateoas(&request.consumed_path, body, &params)
    } else {
        as_mapping(body)
    };

    if let Some(collection) = collection {
        let query = child_query(request, &paging, config)?;
        let children = collection.get_children(&query)?.unwrap_or_default();
        let items = children
            .into_iter()
            .map(|(name, child)| child_item(request, name, &child, decorate))
            .collect::<Result<Vec<_>, _>>()?;
        map.insert(ITEMS.to_owned(), Value::Array(items));
    }

    if let Some(name) = request.name() {
        map.entry(NAME)
            .or_insert_with(|| Value::String(name.to_owned()));
    }
    Ok(Value::Object(map))
}

/// Listing query with the configured page size filling a missing `count`, and
/// `page` turned into an offset.
fn child_query(
    request: &Request,
    paging: &Paging,
    config: &ServeConfig,
) -> Result<ChildQuery, DispatchError> {
    let mut query = ChildQuery::from_query(&request.query, paging)?;
    let count = query.count.unwrap_or(config.default_count);
    query.count = Some(count);
    if query.offset.is_none() {
        let page = paging.page.unwrap_or(1);
        query.offset = Some(page.saturating_sub(1).saturating_mul(count));
    }
    config.limits.validate(&query)?;
    Ok(query)
}

fn child_item(
    request: &Request,
    name: String,
    child: &ResourceRef,
    decorate: bool,
) -> Result<Value, DispatchError> {
    let digest = match child.as_structured() {
        Some(s) => s.get_structured_body(true)?,
        None => Value::Object(Map::new()),
    };
    if !decorate {
        return Ok(digest);
    }

    let mut path = request.consumed_path.clone();
    path.push(name);
    let params = if is_pageable(child.as_ref()) {
        LinkParams::default().pageable(true).with_page(1)
    } else {
        LinkParams::default()
    };
    Ok(Value::Object(hateoas(&path, digest, &params)))
}
