//! The coffee supply-chain network used by the demo binary, benches and tests

use crate::graph::{id_set, property_map, FunctionHandle, GraphResult, GraphStore};

/// Registry name bound to every coffee prompt interface
pub const IDENTITY_FUNCTION: &str = "identity";

/// Populate `store` with beans, roasters and shops plus their patterns,
/// iQueries, attributes and prompts
pub fn populate(store: &mut GraphStore) -> GraphResult<()> {
    // Entities
    store.add_entity("CoffeeBean", Some(property_map([("type", "Arabica")])), Some(id_set(["BeanPattern"])))?;
    store.add_entity("Roaster", Some(property_map([("name", "Roaster One")])), Some(id_set(["RoasterPattern"])))?;
    store.add_entity("CoffeeShop", Some(property_map([("name", "Coffee Shop One")])), Some(id_set(["ShopPattern"])))?;

    // Patterns
    store.add_pattern("BeanPattern", Some(id_set(["BeanQuery"])), None, Some(id_set(["RoasterPattern"])))?;
    store.add_pattern(
        "RoasterPattern",
        Some(id_set(["RoasterQuery"])),
        Some(id_set(["BeanPattern"])),
        Some(id_set(["ShopPattern"])),
    )?;
    store.add_pattern("ShopPattern", Some(id_set(["ShopQuery"])), Some(id_set(["RoasterPattern"])), None)?;

    // iQueries
    store.add_iquery("BeanQuery", "BID1", id_set(["BeanPrompt"]))?;
    store.add_iquery("RoasterQuery", "RID1", id_set(["RoasterPrompt"]))?;
    store.add_iquery("ShopQuery", "SID1", id_set(["ShopPrompt"]))?;

    // Attributes
    store.add_attribute("BeanAttribute", "BID1", Some(property_map([("origin", "Ethiopia")])), Some(id_set(["BeanPattern"])))?;
    store.add_attribute("RoasterAttribute", "RID1", Some(property_map([("method", "Medium Roast")])), Some(id_set(["RoasterPattern"])))?;
    store.add_attribute("ShopAttribute", "SID1", Some(property_map([("location", "Downtown")])), Some(id_set(["ShopPattern"])))?;

    // Prompt interfaces
    for prompt in ["BeanPrompt", "RoasterPrompt", "ShopPrompt"] {
        store.add_prompt_interface(prompt, FunctionHandle::registered(IDENTITY_FUNCTION))?;
    }

    // Relationships
    store.add_relationship("CoffeeBean", "BeanPattern", "conforms_to")?;
    store.add_relationship("Roaster", "RoasterPattern", "conforms_to")?;
    store.add_relationship("CoffeeShop", "ShopPattern", "conforms_to")?;
    store.add_relationship("CoffeeBean", "Roaster", "processed_by")?;
    store.add_relationship("Roaster", "CoffeeShop", "supplies")?;
    store.add_relationship("BeanPattern", "RoasterPattern", "parent_of")?;
    store.add_relationship("RoasterPattern", "ShopPattern", "parent_of")?;
    store.add_relationship("BeanQuery", "BeanPrompt", "uses")?;
    store.add_relationship("RoasterQuery", "RoasterPrompt", "uses")?;
    store.add_relationship("ShopQuery", "ShopPrompt", "uses")?;

    Ok(())
}

/// A fresh store holding the coffee network
pub fn coffee_network() -> GraphResult<GraphStore> {
    let mut store = GraphStore::new();
    populate(&mut store)?;
    Ok(store)
}
