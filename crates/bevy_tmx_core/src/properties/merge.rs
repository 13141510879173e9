use bevy_tmx_assets::format::Property;

/// Combine instance and tile properties; the instance wins on equal names.
///
/// Instance entries come first, unchanged and in order, followed by the tile
/// entries whose name the instance does not define. Names are compared
/// exactly, regardless of declared type.
pub fn merge_properties(instance: &[Property], tile: &[Property]) -> Vec<Property> {
    let mut merged = instance.to_vec();
    merged.extend(
        tile.iter()
            .filter(|property| !instance.iter().any(|own| own.name == property.name))
            .cloned(),
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_overrides_tile() {
        let instance = vec![
            Property::new("health", "int", "5"),
            Property::new("label", "string", "gate"),
        ];
        let tile = vec![
            Property::new("health", "float", "10"),
            Property::new("solid", "bool", "true"),
            Property::new("Label", "string", "other"),
        ];

        let merged = merge_properties(&instance, &tile);
        assert_eq!(merged.len(), instance.len() + 2);
        assert_eq!(&merged[..2], &instance[..]);
        assert_eq!(merged[2].name, "solid");
        // case-sensitive: "Label" is a different property
        assert_eq!(merged[3].name, "Label");
        assert_eq!(
            merged.iter().filter(|property| property.name == "health").count(),
            1
        );
    }

    #[test]
    fn test_empty_sides() {
        let tile = vec![Property::new("solid", "bool", "true")];
        assert_eq!(merge_properties(&[], &tile), tile);
        assert_eq!(merge_properties(&tile, &[]), tile);
    }
}
