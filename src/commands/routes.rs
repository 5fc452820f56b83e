//! Enumerate pre-renderable routes

use anyhow::Result;

use crate::Folio;

/// Print every route the site can pre-render
pub fn run(folio: &Folio, json: bool) -> Result<()> {
    let routes = folio.repository().routes(&folio.config);

    if json {
        return super::print_json(&routes);
    }

    println!("Routes ({}):", routes.len());
    for route in routes {
        println!("  {}", route);
    }

    Ok(())
}
