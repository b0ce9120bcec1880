use std::error::Error;

use zarrs2::{
    array::{
        codec::{BloscCodecConfiguration, Compressor, ZlibCodecConfiguration},
        Array, ArrayBuilder, ChunkKeySeparator, DataType, FillValue, Order,
    },
    node::NodePath,
    storage::{
        store::{FilesystemStore, MemoryStore},
        ReadableStorageTraits, StoreKey, WritableStorageTraits,
    },
};

fn to_json(data: &[u8]) -> serde_json::Value {
    let data = std::str::from_utf8(data).unwrap();
    serde_json::from_str(data).unwrap()
}

#[test]
fn int_1d_round_trip_memory() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;

    let array = ArrayBuilder::new(vec![6], DataType::from_typestr("<i4")?)
        .chunk_shape(vec![3])
        .build_from_elements::<i32>(&[1, 2, 3, 4, 5, 6])?;
    array.store(&store, &path)?;

    let metadata = to_json(&store.get(&StoreKey::new("array/.zarray")?)?.unwrap());
    assert_eq!(metadata["zarr_format"], 2);
    assert_eq!(metadata["shape"], serde_json::json!([6]));
    assert_eq!(metadata["chunks"], serde_json::json!([3]));
    assert_eq!(metadata["dtype"], "<i4");
    assert_eq!(metadata["compressor"], serde_json::Value::Null);
    assert_eq!(metadata["fill_value"], serde_json::Value::Null);
    assert_eq!(metadata["filters"], serde_json::Value::Null);
    assert_eq!(metadata["order"], "C");

    // uncompressed little-endian payloads
    assert_eq!(
        store.get(&StoreKey::new("array/0")?)?.unwrap(),
        [1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]
    );
    assert_eq!(
        store.get(&StoreKey::new("array/1")?)?.unwrap(),
        [4, 0, 0, 0, 5, 0, 0, 0, 6, 0, 0, 0]
    );

    let reloaded = Array::open(&store, &path)?;
    assert_eq!(reloaded, array);
    assert_eq!(reloaded.elements::<i32>()?, [1, 2, 3, 4, 5, 6]);
    Ok(())
}

#[test]
fn big_endian_payload() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;

    let array = ArrayBuilder::new(vec![2], DataType::from_typestr(">i4")?)
        .chunk_shape(vec![2])
        .build_from_elements::<i32>(&[1, 2])?;
    array.store(&store, &path)?;

    assert_eq!(
        store.get(&StoreKey::new("array/0")?)?.unwrap(),
        [0, 0, 0, 1, 0, 0, 0, 2]
    );
    assert_eq!(Array::open(&store, &path)?.elements::<i32>()?, [1, 2]);
    Ok(())
}

fn identity_matrix_blosc() -> Result<Array, Box<dyn Error>> {
    let mut elements = vec![0.0f64; 16];
    for i in 0..4 {
        elements[i * 4 + i] = 1.0;
    }
    let compressor: BloscCodecConfiguration = serde_json::from_str(
        r#"{"cname": "lz4", "clevel": 5, "shuffle": 1, "blocksize": 0}"#,
    )?;
    Ok(
        ArrayBuilder::new(vec![4, 4], DataType::from_typestr("<f8")?)
            .chunk_shape(vec![2, 2])
            .compressor(Compressor::Blosc(compressor))
            .fill_value(FillValue::from(0.0f64))
            .build_from_elements::<f64>(&elements)?,
    )
}

#[test]
#[cfg_attr(miri, ignore)]
fn float_2d_blosc_round_trip_filesystem() -> Result<(), Box<dyn Error>> {
    let tmp = tempfile::TempDir::new()?;
    let store = FilesystemStore::new(tmp.path())?;
    let path = NodePath::new("/identity")?;

    let array = identity_matrix_blosc()?;
    array.store(&store, &path)?;

    for key in [".zarray", "0.0", "0.1", "1.0", "1.1"] {
        assert!(tmp.path().join("identity").join(key).is_file());
    }

    let reloaded = Array::open(&store, &path)?;
    assert_eq!(reloaded, array);
    for i in 0..4 {
        for j in 0..4 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_eq!(reloaded.get::<f64>(&[i, j])?, expected);
        }
    }
    Ok(())
}

#[test]
fn missing_chunk_reads_as_fill_value() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/identity")?;

    let array = identity_matrix_blosc()?;
    array.store(&store, &path)?;
    store.erase(&StoreKey::new("identity/1.1")?)?;

    let reloaded = Array::open(&store, &path)?;
    for i in 0..4 {
        for j in 0..4 {
            let expected = if i == j && i < 2 { 1.0 } else { 0.0 };
            assert_eq!(reloaded.get::<f64>(&[i, j])?, expected);
        }
    }
    Ok(())
}

#[test]
fn ragged_last_chunk_is_padded_with_fill_value() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;

    let array = ArrayBuilder::new(vec![5], DataType::from_typestr("|u1")?)
        .chunk_shape(vec![2])
        .fill_value(FillValue::from(0u8))
        .build_from_elements::<u8>(&[10, 20, 30, 40, 50])?;
    array.store(&store, &path)?;

    assert_eq!(store.get(&StoreKey::new("array/0")?)?.unwrap(), [10, 20]);
    assert_eq!(store.get(&StoreKey::new("array/1")?)?.unwrap(), [30, 40]);
    // the final chunk is stored full-size, padded with the fill value
    assert_eq!(store.get(&StoreKey::new("array/2")?)?.unwrap(), [50, 0]);

    let reloaded = Array::open(&store, &path)?;
    assert_eq!(reloaded.elements::<u8>()?, [10, 20, 30, 40, 50]);
    Ok(())
}

#[test]
fn zlib_round_trip_memory() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;

    let compressor: ZlibCodecConfiguration = serde_json::from_str(r#"{"level": 6}"#)?;
    let elements: Vec<i64> = (0..1000).collect();
    let array = ArrayBuilder::new(vec![1000], DataType::from_typestr("<i8")?)
        .chunk_shape(vec![256])
        .compressor(Compressor::Zlib(compressor))
        .build_from_elements::<i64>(&elements)?;
    array.store(&store, &path)?;

    let reloaded = Array::open(&store, &path)?;
    assert_eq!(reloaded, array);
    assert_eq!(reloaded.elements::<i64>()?, elements);
    Ok(())
}

#[test]
fn order_c_and_f_load_equal_elements() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let elements: Vec<i16> = (0..24).collect();

    for (name, order) in [("c", Order::C), ("f", Order::F)] {
        let array = ArrayBuilder::new(vec![4, 6], DataType::from_typestr("<i2")?)
            .chunk_shape(vec![3, 2])
            .order(order)
            .build_from_elements::<i16>(&elements)?;
        array.store(&store, &NodePath::root().child(name)?)?;
    }

    let c = Array::open(&store, &NodePath::new("/c")?)?;
    let f = Array::open(&store, &NodePath::new("/f")?)?;
    assert_ne!(
        store.get(&StoreKey::new("c/0.0")?)?,
        store.get(&StoreKey::new("f/0.0")?)?
    );
    assert_eq!(c.elements::<i16>()?, f.elements::<i16>()?);
    Ok(())
}

#[test]
fn structured_dtype_round_trip() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;

    let data_type =
        DataType::from_metadata(&serde_json::from_str(r#"[["a", "<i2"], ["b", "<f4"]]"#)?)?;
    assert_eq!(data_type.size(), 6);

    // two elements: (1, 1.5) and (2, 2.5), packed in the native layout
    let mut bytes = Vec::new();
    bytes.extend(1i16.to_ne_bytes());
    bytes.extend(1.5f32.to_ne_bytes());
    bytes.extend(2i16.to_ne_bytes());
    bytes.extend(2.5f32.to_ne_bytes());

    let array = ArrayBuilder::new(vec![2], data_type)
        .chunk_shape(vec![2])
        .build_from_bytes(&bytes)?;
    array.store(&store, &path)?;

    let payload = store.get(&StoreKey::new("array/0")?)?.unwrap();
    assert_eq!(payload.len(), 12);
    assert_eq!(
        payload,
        [
            0x01, 0x00, 0x00, 0x00, 0xC0, 0x3F, // (1, 1.5)
            0x02, 0x00, 0x00, 0x00, 0x20, 0x40, // (2, 2.5)
        ]
    );

    let metadata = to_json(&store.get(&StoreKey::new("array/.zarray")?)?.unwrap());
    assert_eq!(
        metadata["dtype"],
        serde_json::json!([["a", "<i2"], ["b", "<f4"]])
    );

    let reloaded = Array::open(&store, &path)?;
    assert_eq!(reloaded, array);
    assert_eq!(reloaded.element_bytes(&[0])?, &bytes[0..6]);
    assert_eq!(reloaded.element_bytes(&[1])?, &bytes[6..12]);
    Ok(())
}

#[test]
fn rank_zero_array_has_chunk_key_zero() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/scalar")?;

    let array = ArrayBuilder::new(vec![], DataType::from_typestr("<f4")?)
        .build_from_elements::<f32>(&[7.0])?;
    array.store(&store, &path)?;

    assert!(store.key_exists(&StoreKey::new("scalar/0")?)?);
    let reloaded = Array::open(&store, &path)?;
    assert_eq!(reloaded.get::<f32>(&[])?, 7.0);
    Ok(())
}

#[test]
fn slash_dimension_separator() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;

    let array = ArrayBuilder::new(vec![2, 2], DataType::from_typestr("|u1")?)
        .chunk_shape(vec![1, 1])
        .dimension_separator(ChunkKeySeparator::Slash)
        .build_from_elements::<u8>(&[1, 2, 3, 4])?;
    array.store(&store, &path)?;

    assert!(store.key_exists(&StoreKey::new("array/1/0")?)?);
    let reloaded = Array::open(&store, &path)?;
    assert_eq!(reloaded, array);
    Ok(())
}

#[test]
fn attributes_round_trip() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;

    let attributes = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(
        r#"{"spam": "ham", "eggs": 42}"#,
    )?;
    let array = ArrayBuilder::new(vec![1], DataType::from_typestr("|u1")?)
        .attributes(attributes.clone())
        .build_from_elements::<u8>(&[1])?;
    array.store(&store, &path)?;

    assert!(store.key_exists(&StoreKey::new("array/.zattrs")?)?);
    let reloaded = Array::open(&store, &path)?;
    assert_eq!(reloaded.attributes(), &attributes);
    Ok(())
}

#[test]
fn fill_value_metadata_round_trip() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;

    let array = ArrayBuilder::new(vec![2], DataType::from_typestr("<f8")?)
        .chunk_shape(vec![2])
        .fill_value(FillValue::from(f64::NAN))
        .build_from_elements::<f64>(&[1.0, 2.0])?;
    array.store(&store, &path)?;

    let metadata = to_json(&store.get(&StoreKey::new("array/.zarray")?)?.unwrap());
    assert_eq!(metadata["fill_value"], "NaN");

    let reloaded = Array::open(&store, &path)?;
    assert!(reloaded.fill_value().is_some());
    Ok(())
}

#[test]
fn open_missing_array_fails() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    assert!(Array::open(&store, &NodePath::new("/nowhere")?).is_err());
    Ok(())
}

#[test]
fn open_array_with_unknown_compressor_fails() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;
    let array = ArrayBuilder::new(vec![1], DataType::from_typestr("|u1")?)
        .build_from_elements::<u8>(&[1])?;
    array.store(&store, &path)?;

    let key = StoreKey::new("array/.zarray")?;
    let mut metadata = to_json(&store.get(&key)?.unwrap());
    metadata["compressor"] = serde_json::json!({"id": "lzma", "preset": 9});
    store.set(&key, serde_json::to_string(&metadata)?.as_bytes())?;

    assert!(Array::open(&store, &path).is_err());
    Ok(())
}

#[test]
fn open_array_with_corrupt_chunk_fails() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let path = NodePath::new("/array")?;
    let array = ArrayBuilder::new(vec![4], DataType::from_typestr("<i4")?)
        .chunk_shape(vec![4])
        .build_from_elements::<i32>(&[1, 2, 3, 4])?;
    array.store(&store, &path)?;

    // truncated payload
    store.set(&StoreKey::new("array/0")?, &[0, 1])?;
    assert!(Array::open(&store, &path).is_err());
    Ok(())
}
