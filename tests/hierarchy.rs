use std::error::Error;

use zarrs2::{
    array::{Array, ArrayBuilder, DataType, FillValue},
    group::{Group, Node},
    hierarchy::{FromZarr, HierarchyError, ToZarr},
    node::NodePath,
    storage::{
        store::{FilesystemStore, MemoryStore},
        ReadableStorageTraits, StoreKey, WritableStorageTraits,
    },
    zarr_record,
};

fn temperature_array() -> Result<Array, Box<dyn Error>> {
    Ok(
        ArrayBuilder::new(vec![4], DataType::from_typestr("<f4")?)
            .fill_value(FillValue::from(0.0f32))
            .build_from_elements::<f32>(&[20.5, 21.0, 19.5, 18.0])?,
    )
}

fn mask_array() -> Result<Array, Box<dyn Error>> {
    Ok(ArrayBuilder::new(vec![4], DataType::from_typestr("|u1")?)
        .build_from_elements::<u8>(&[1, 1, 0, 1])?)
}

zarr_record! {
    #[derive(Debug, PartialEq)]
    struct Sample {
        temperature: Array,
        mask: Array,
    }
}

#[test]
#[cfg_attr(miri, ignore)]
fn record_round_trip_filesystem() -> Result<(), Box<dyn Error>> {
    let tmp = tempfile::TempDir::new()?;
    let store = FilesystemStore::new(tmp.path())?;
    let path = NodePath::new("/sample")?;

    let sample = Sample {
        temperature: temperature_array()?,
        mask: mask_array()?,
    };
    sample.to_zarr(&store, &path)?;

    for file in [
        "sample/.zgroup",
        "sample/temperature/.zarray",
        "sample/temperature/0",
        "sample/mask/.zarray",
        "sample/mask/0",
    ] {
        assert!(tmp.path().join(file).is_file(), "missing {file}");
    }

    let reloaded = Sample::from_zarr(&store, &path)?;
    assert_eq!(reloaded, sample);
    assert_eq!(
        reloaded.temperature.elements::<f32>()?,
        [20.5, 21.0, 19.5, 18.0]
    );
    Ok(())
}

#[test]
fn record_missing_child() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/sample")?;

    let sample = Sample {
        temperature: temperature_array()?,
        mask: mask_array()?,
    };
    sample.to_zarr(&store, &path)?;
    store.erase(&StoreKey::new("sample/mask/.zarray")?)?;

    let result = Sample::from_zarr(&store, &path);
    assert!(matches!(
        result,
        Err(HierarchyError::MissingChild(name)) if name == "mask"
    ));
    Ok(())
}

#[test]
fn record_malformed_child() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/sample")?;

    let sample = Sample {
        temperature: temperature_array()?,
        mask: mask_array()?,
    };
    sample.to_zarr(&store, &path)?;
    store.set(&StoreKey::new("sample/mask/.zarray")?, b"not json")?;

    let result = Sample::from_zarr(&store, &path);
    assert!(matches!(
        result,
        Err(HierarchyError::MalformedChild { name, .. }) if name == "mask"
    ));
    Ok(())
}

zarr_record! {
    struct Station {
        sample: Sample,
        pressure: Option<Array>,
    }
}

#[test]
fn record_optional_field_absent() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/station")?;

    let station = Station {
        sample: Sample {
            temperature: temperature_array()?,
            mask: mask_array()?,
        },
        pressure: None,
    };
    station.to_zarr(&store, &path)?;

    // an absent optional field writes no subdirectory at all
    assert!(!store.key_exists(&StoreKey::new("station/pressure/.zarray")?)?);
    assert!(!store.key_exists(&StoreKey::new("station/pressure/.zgroup")?)?);

    let reloaded = Station::from_zarr(&store, &path)?;
    assert!(reloaded.pressure.is_none());
    assert_eq!(reloaded.sample.mask.elements::<u8>()?, [1, 1, 0, 1]);
    Ok(())
}

#[test]
fn record_optional_field_present() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/station")?;

    let station = Station {
        sample: Sample {
            temperature: temperature_array()?,
            mask: mask_array()?,
        },
        pressure: Some(temperature_array()?),
    };
    station.to_zarr(&store, &path)?;

    let reloaded = Station::from_zarr(&store, &path)?;
    assert!(reloaded.pressure.is_some());
    Ok(())
}

zarr_record! {
    enum Reading {
        Dense(Array),
        Tree(Group),
    }
}

#[test]
fn variant_round_trip() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();

    // a variant saves into the same directory; identity is recovered structurally
    let dense = Reading::Dense(mask_array()?);
    dense.to_zarr(&store, &NodePath::new("/dense")?)?;
    assert!(matches!(
        Reading::from_zarr(&store, &NodePath::new("/dense")?)?,
        Reading::Dense(_)
    ));

    let mut group = Group::new();
    group.insert("mask", mask_array()?)?;
    let tree = Reading::Tree(group);
    tree.to_zarr(&store, &NodePath::new("/tree")?)?;
    assert!(matches!(
        Reading::from_zarr(&store, &NodePath::new("/tree")?)?,
        Reading::Tree(_)
    ));

    assert!(matches!(
        Reading::from_zarr(&store, &NodePath::new("/nowhere")?),
        Err(HierarchyError::NoMatchingVariant("Reading"))
    ));
    Ok(())
}

#[test]
fn group_tree_round_trip() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/root")?;

    let attributes = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(
        r#"{"description": "test hierarchy"}"#,
    )?;
    let mut inner = Group::new();
    inner.insert("temperature", temperature_array()?)?;
    let mut root = Group::new_with_attributes(attributes.clone());
    root.insert("a", inner)?;
    root.insert("mask", mask_array()?)?;
    root.store(&store, &path)?;

    assert!(store.key_exists(&StoreKey::new("root/.zgroup")?)?);
    assert!(store.key_exists(&StoreKey::new("root/.zattrs")?)?);
    assert!(store.key_exists(&StoreKey::new("root/a/.zgroup")?)?);
    assert!(store.key_exists(&StoreKey::new("root/a/temperature/.zarray")?)?);

    let reloaded = Group::open(&store, &path)?;
    assert_eq!(reloaded, root);
    assert_eq!(reloaded.attributes(), &attributes);
    assert_eq!(reloaded.num_children(), 2);
    let Some(Node::Group(inner)) = reloaded.child("a") else {
        panic!("expected a child group")
    };
    assert_eq!(
        inner.array("temperature").unwrap().elements::<f32>()?,
        [20.5, 21.0, 19.5, 18.0]
    );
    Ok(())
}

#[test]
fn group_open_skips_foreign_directories() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/root")?;

    let mut root = Group::new();
    root.insert("mask", mask_array()?)?;
    root.store(&store, &path)?;
    store.set(&StoreKey::new("root/stray/readme.txt")?, b"not a node")?;

    let reloaded = Group::open(&store, &path)?;
    assert_eq!(reloaded.num_children(), 1);
    assert!(reloaded.child("stray").is_none());
    Ok(())
}

#[test]
fn group_open_missing_metadata_fails() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    assert!(Group::open(&store, &NodePath::new("/nowhere")?).is_err());
    Ok(())
}
