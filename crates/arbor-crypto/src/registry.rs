use std::collections::HashMap;
use std::fmt;

use sha1collisiondetection::Sha1CD;
use sha2::Digest;
use tracing::info;

use arbor_types::ObjectFormat;

use crate::error::{RegistryError, RegistryResult};

/// Hash functions a caller may name when configuring the registry.
///
/// Only the functions backing an [`ObjectFormat`] can be registered; naming
/// any other function is rejected so that identity computation stays
/// predictable across the system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashFunction {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Blake3,
}

impl HashFunction {
    /// Digest length in bytes.
    pub const fn size(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// The hash function an object format identifies objects with.
    pub const fn for_object_format(format: ObjectFormat) -> Self {
        match format {
            ObjectFormat::Sha1 => Self::Sha1,
            ObjectFormat::Sha256 => Self::Sha256,
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sha1 => "SHA-1",
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
            Self::Blake3 => "BLAKE3",
        };
        f.write_str(name)
    }
}

/// A fresh, single-use hash computation.
pub trait Digester: Send {
    /// Feed more input.
    fn update(&mut self, data: &[u8]);

    /// Consume the digester and return the digest.
    fn finalize(self: Box<Self>) -> Vec<u8>;

    /// Length of the digest this digester produces.
    fn output_size(&self) -> usize;

    /// Name of the implementing type, for logs and diagnostics.
    fn implementation(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Constructor installed in the registry for one hash function.
pub type DigesterFactory = fn() -> Box<dyn Digester>;

/// Adapts any RustCrypto [`Digest`] implementation to [`Digester`].
pub struct CoreDigester<D>(D);

impl<D: Digest + Send + 'static> CoreDigester<D> {
    /// A boxed, freshly initialized digester.
    pub fn boxed() -> Box<dyn Digester> {
        Box::new(Self(D::new()))
    }
}

impl<D: Digest + Send> Digester for CoreDigester<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        let Self(inner) = *self;
        inner.finalize().to_vec()
    }

    fn output_size(&self) -> usize {
        <D as Digest>::output_size()
    }
}

/// Mapping from hash function to digester constructor.
///
/// Constructed with the default implementations: collision-detecting SHA-1
/// (inputs carrying a known SHA-1 collision attack hash differently than
/// plain SHA-1 would) and SHA-256. Overrides
/// go through [`register`](Self::register), which needs `&mut self`: once
/// the registry is shared, it is read-only.
#[derive(Clone, Debug)]
pub struct DigestRegistry {
    algos: HashMap<HashFunction, DigesterFactory>,
}

impl DigestRegistry {
    /// A registry holding the default implementations.
    pub fn new() -> Self {
        let mut registry = Self {
            algos: HashMap::new(),
        };
        registry.install_defaults();
        registry
    }

    fn install_defaults(&mut self) {
        self.algos.insert(HashFunction::Sha1, CoreDigester::<Sha1CD>::boxed);
        self.algos.insert(HashFunction::Sha256, CoreDigester::<sha2::Sha256>::boxed);
    }

    /// Install or override the constructor for `function`.
    ///
    /// Fails with [`RegistryError::InvalidArgument`] when `factory` is
    /// `None` or produces digests of the wrong length (both the advertised
    /// length and the length of an actual digest are checked), and with
    /// [`RegistryError::UnsupportedFormat`] when `function` backs no
    /// object format.
    pub fn register(
        &mut self,
        function: HashFunction,
        factory: Option<DigesterFactory>,
    ) -> RegistryResult<()> {
        let factory = factory
            .ok_or_else(|| RegistryError::InvalidArgument("factory is missing".into()))?;

        match function {
            HashFunction::Sha1 | HashFunction::Sha256 => {}
            other => return Err(RegistryError::UnsupportedFormat(other)),
        }

        let sample = factory();
        let advertised = sample.output_size();
        let produced = sample.finalize().len();
        if advertised != function.size() || produced != function.size() {
            return Err(RegistryError::InvalidArgument(format!(
                "{function} digests are {} bytes, factory advertises {advertised} and produces {produced}",
                function.size()
            )));
        }

        info!(%function, "hash algorithm overridden");
        self.algos.insert(function, factory);
        Ok(())
    }

    /// A fresh digester for `function`.
    ///
    /// # Panics
    ///
    /// Panics if no constructor is registered for `function`. Formats are
    /// fixed at startup, so a miss is a programming error.
    pub fn new_digester(&self, function: HashFunction) -> Box<dyn Digester> {
        match self.algos.get(&function) {
            Some(factory) => factory(),
            None => panic!("hash algorithm not registered: {function}"),
        }
    }

    /// A fresh digester for the hash function behind `format`.
    pub fn for_object_format(&self, format: ObjectFormat) -> Box<dyn Digester> {
        self.new_digester(HashFunction::for_object_format(format))
    }

    /// Convert an external format token into an [`ObjectFormat`].
    pub fn resolve(token: &str) -> RegistryResult<ObjectFormat> {
        ObjectFormat::resolve(token).map_err(|_| RegistryError::InvalidObjectFormat(token.into()))
    }

    /// Restore the default implementations, dropping every override.
    #[cfg(any(test, feature = "test-util"))]
    pub fn reset(&mut self) {
        self.algos.clear();
        self.install_defaults();
    }
}

impl Default for DigestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blake3Digester(blake3::Hasher);

    impl Digester for Blake3Digester {
        fn update(&mut self, data: &[u8]) {
            self.0.update(data);
        }

        fn finalize(self: Box<Self>) -> Vec<u8> {
            self.0.finalize().as_bytes().to_vec()
        }

        fn output_size(&self) -> usize {
            blake3::OUT_LEN
        }
    }

    fn blake3_digester() -> Box<dyn Digester> {
        Box::new(Blake3Digester(blake3::Hasher::new()))
    }

    fn digest_hex(registry: &DigestRegistry, function: HashFunction, data: &[u8]) -> String {
        let mut digester = registry.new_digester(function);
        digester.update(data);
        hex::encode(digester.finalize())
    }

    #[test]
    fn defaults_produce_known_vectors() {
        let registry = DigestRegistry::new();
        assert_eq!(
            digest_hex(&registry, HashFunction::Sha1, b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            digest_hex(&registry, HashFunction::Sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn incremental_updates_match_one_shot() {
        let registry = DigestRegistry::new();
        let mut digester = registry.new_digester(HashFunction::Sha1);
        digester.update(b"a");
        digester.update(b"bc");
        assert_eq!(
            hex::encode(digester.finalize()),
            digest_hex(&registry, HashFunction::Sha1, b"abc")
        );
    }

    #[test]
    fn object_format_selects_function() {
        let registry = DigestRegistry::new();
        assert_eq!(registry.for_object_format(ObjectFormat::Sha1).output_size(), 20);
        assert_eq!(registry.for_object_format(ObjectFormat::Sha256).output_size(), 32);
    }

    #[test]
    fn register_overrides_constructor() {
        let mut registry = DigestRegistry::new();
        registry
            .register(HashFunction::Sha256, Some(blake3_digester))
            .unwrap();
        assert_eq!(
            digest_hex(&registry, HashFunction::Sha256, b"abc"),
            blake3::hash(b"abc").to_hex().to_string()
        );
        // SHA-1 is untouched.
        assert_eq!(
            digest_hex(&registry, HashFunction::Sha1, b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn register_rejects_missing_factory() {
        let mut registry = DigestRegistry::new();
        let err = registry.register(HashFunction::Sha1, None).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidArgument(_)));
    }

    #[test]
    fn register_rejects_unsupported_function() {
        let mut registry = DigestRegistry::new();
        for function in [
            HashFunction::Sha224,
            HashFunction::Sha384,
            HashFunction::Sha512,
            HashFunction::Blake3,
        ] {
            let err = registry
                .register(function, Some(CoreDigester::<sha2::Sha512>::boxed))
                .unwrap_err();
            assert_eq!(err, RegistryError::UnsupportedFormat(function));
        }
    }

    #[test]
    fn register_rejects_wrong_digest_size() {
        let mut registry = DigestRegistry::new();
        let err = registry
            .register(HashFunction::Sha1, Some(CoreDigester::<sha2::Sha256>::boxed))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidArgument(_)));
        assert_eq!(registry.for_object_format(ObjectFormat::Sha1).output_size(), 20);
    }

    /// Claims SHA-1's length but emits a truncated digest.
    struct Truncating(Box<dyn Digester>);

    impl Digester for Truncating {
        fn update(&mut self, data: &[u8]) {
            self.0.update(data);
        }

        fn finalize(self: Box<Self>) -> Vec<u8> {
            let mut digest = self.0.finalize();
            digest.truncate(7);
            digest
        }

        fn output_size(&self) -> usize {
            20
        }
    }

    fn truncating_digester() -> Box<dyn Digester> {
        Box::new(Truncating(CoreDigester::<sha1::Sha1>::boxed()))
    }

    #[test]
    fn register_checks_actual_digest_length() {
        let mut registry = DigestRegistry::new();
        let err = registry
            .register(HashFunction::Sha1, Some(truncating_digester))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidArgument(msg) if msg.contains("produces 7")));

        let mut digester = registry.for_object_format(ObjectFormat::Sha1);
        digester.update(b"abc");
        assert_eq!(digester.finalize().len(), 20);
    }

    #[test]
    fn default_sha1_detects_collisions() {
        let registry = DigestRegistry::new();
        let digester = registry.new_digester(HashFunction::Sha1);
        assert!(digester.implementation().contains("sha1collisiondetection"));
        let digester = registry.new_digester(HashFunction::Sha256);
        assert!(digester.implementation().contains("Sha256"));
    }

    #[test]
    fn hardened_sha1_agrees_with_plain_sha1_on_ordinary_input() {
        let registry = DigestRegistry::new();
        let input = b"tree 0\0".repeat(100);
        let plain = {
            let mut d = CoreDigester::<sha1::Sha1>::boxed();
            d.update(&input);
            d.finalize()
        };
        let mut hardened = registry.new_digester(HashFunction::Sha1);
        hardened.update(&input);
        assert_eq!(hardened.finalize(), plain);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut registry = DigestRegistry::new();
        registry
            .register(HashFunction::Sha256, Some(blake3_digester))
            .unwrap();
        registry.reset();
        assert_eq!(
            digest_hex(&registry, HashFunction::Sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    #[should_panic(expected = "hash algorithm not registered: SHA-512")]
    fn unregistered_function_is_fatal() {
        let registry = DigestRegistry::new();
        let _ = registry.new_digester(HashFunction::Sha512);
    }

    #[test]
    fn resolve_tokens() {
        assert_eq!(DigestRegistry::resolve("sha1").unwrap(), ObjectFormat::Sha1);
        assert_eq!(DigestRegistry::resolve("sha256").unwrap(), ObjectFormat::Sha256);
        assert_eq!(
            DigestRegistry::resolve("md5").unwrap_err(),
            RegistryError::InvalidObjectFormat("md5".into())
        );
    }
}
