use std::path::PathBuf;
use crate::uploads::UploadStore;

pub fn add_documents(store: &UploadStore, path: PathBuf, recursive: bool) -> anyhow::Result<()> {
    println!("Importing: {}", path.display());
    let imported = store.import(&path, recursive)?;
    println!("Imported {} files into {}", imported.len(), store.dir().display());
    for name in imported {
        println!("\t{}", name);
    }
    Ok(())
}

pub fn list_documents(store: &UploadStore) -> anyhow::Result<()> {
    let files = store.list()?;
    println!("\nUploaded files:");
    for file in files {
        println!("\t{}\t{}\t{} bytes", file.name, file.file_type, file.size);
    }
    Ok(())
}

pub fn remove_document(store: &UploadStore, name: &str) -> anyhow::Result<()> {
    store.remove(name)?;
    println!("File {} deleted successfully", name);
    Ok(())
}
