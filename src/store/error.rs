/// Generic error kinds for the storage layer. A backend implementor may carry
/// its own, more specific error type, but it is rendered into one of these
/// kinds before crossing the adapter boundary. Kinds classify, they do not
/// identify: "not found" is a message on the Update/Delete kinds, not a kind
/// of its own.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A supplied value could not be translated to or from the store's
    /// native encoding. Always a caller input problem.
    #[error("storage convert error: {0}")]
    Convert(String),

    /// The store rejected a write, e.g. a duplicate key.
    #[error("storage insert error: {0}")]
    Insert(String),

    /// A replace failed, or matched zero documents.
    #[error("storage update error: {0}")]
    Update(String),

    /// A delete failed, or matched zero documents.
    #[error("storage delete error: {0}")]
    Delete(String),

    /// The store rejected or failed a read.
    #[error("storage find error: {0}")]
    Find(String),

    /// Establishing or releasing the backing connection failed.
    #[error("storage connection error: {0}")]
    Connection(String),
}
