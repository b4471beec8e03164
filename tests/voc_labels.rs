use objfind::{extract_objects, extract_objects_from_path, BoundingBox, ObjFindError};

const DOC: &str = r#"<?xml version="1.0"?>
<annotation>
    <folder>images</folder>
    <filename>street.jpg</filename>
    <size><width>640</width><height>480</height><depth>3</depth></size>
    <object>
        <name>cat</name>
        <bndbox><xmin>0</xmin><ymin>0</ymin><xmax>10</xmax><ymax>10</ymax></bndbox>
    </object>
    <object>
        <bndbox><xmin>1</xmin><ymin>1</ymin><xmax>2</xmax><ymax>2</ymax></bndbox>
    </object>
    <object>
        <name>dog</name>
        <bndbox><xmin>5</xmin><ymin>abc</ymin><xmax>9</xmax><ymax>9</ymax></bndbox>
    </object>
    <object>
        <name>car</name>
        <bndbox><xmin>5</xmin><ymin>6</ymin><xmax>9</xmax></bndbox>
    </object>
    <object>
        <name>bike</name>
    </object>
    <object>
        <name> person </name>
        <bndbox><xmin>12.5</xmin><ymin>7</ymin><xmax>40</xmax><ymax>99.25</ymax></bndbox>
    </object>
</annotation>"#;

#[test]
fn keeps_complete_objects_in_order() {
    let ann = extract_objects(DOC).unwrap();
    assert_eq!(ann.filename.as_deref(), Some("street.jpg"));
    let names: Vec<_> = ann.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["cat", "person"]);
    assert_eq!(
        ann.objects[0].bbox,
        BoundingBox {
            xmin: 0.0,
            ymin: 0.0,
            xmax: 10.0,
            ymax: 10.0,
        }
    );
    assert_eq!(ann.objects[1].bbox.xmin, 12.5);
    assert_eq!(ann.objects[1].bbox.ymax, 99.25);
}

#[test]
fn document_without_objects_is_empty() {
    let ann = extract_objects("<annotation><filename>x.png</filename></annotation>").unwrap();
    assert_eq!(ann.filename.as_deref(), Some("x.png"));
    assert!(ann.objects.is_empty());
}

#[test]
fn reads_annotation_files() {
    let path = std::env::temp_dir().join(format!("objfind_voc_{}.xml", std::process::id()));
    std::fs::write(&path, DOC).unwrap();
    let ann = extract_objects_from_path(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(ann.objects.len(), 2);

    let err = extract_objects_from_path(path.with_extension("missing")).unwrap_err();
    assert!(matches!(err, ObjFindError::ImageIo { .. }));
}

#[test]
fn broken_markup_is_reported() {
    let err = extract_objects("<annotation><object></annotation>").unwrap_err();
    assert!(matches!(err, ObjFindError::Xml { .. }));
}
