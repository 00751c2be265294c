//! # Legacy Wallet Vectors
//!
//! Byte-exact outputs of legacy wallets, checked end to end through the
//! service. Any drift here strands addresses already on the ledger.

#[cfg(test)]
mod tests {
    use rnd_derivation::{
        hash_seed, AddressAttributes, AddressPayload, DerivationPath, Ed25519Bip32Engine,
        ExtendedKeyEngine, Hardened, Index, Ownership, Passphrase, RndDerivationApi,
        RndDerivationService, RndKey, Root,
    };

    const GOLDEN_SEED_HASH: &str =
        "58202ed4c71d91bc68c7b50feeb5bc7a785fe884dd0aeddce029df3d612cd3680fd3";

    const ROOT_XPUB: &str = "64b20fa082b3143d6b5eed42c6ef63f99599d0888afe060620abc1b319935fe1\
                             739f4b3caca4c9ad4fcd4bdc2ef42c8601af8d6946999ef85ef6ae84f66e72eb";

    const ACCOUNT_XPUB: &str = "95bb82ffd5707716bc65170ab4e8dafeed90fbe0ce9258713b7751e962d931df\
                                6755cb82e892d6614c007a5efbceb21d95a5244e269d0e206b48b9a495390b03";

    const ADDRESS_XPUB: &str = "dc907c7c06e6314eedd9e18c9f6c6f9cc4e205fb1c70da608234c319f1f7b0d6\
                                d6798491b9fa4612370ae5ef3c623a0b6872f3ad8f26970885fa67c83bdc425e";

    const PAYLOAD_PASSPHRASE: &str =
        "373b46e20bcfd69348b1756d95a20d8628521dd8e91a50d885a1a6ed2b5be638";

    const SENTINEL_PATH_ATTRIBUTE: &str =
        "581c08835c2a02da6317f1bc2b296c267920a5993579bb5875cee659bc60";

    const SOFT_PATH_ATTRIBUTE: &str =
        "581908835c2a02da61bd0e8e73ea249e3d1c8449b9153866f87091";

    fn service() -> RndDerivationService<Ed25519Bip32Engine> {
        RndDerivationService::new(Ed25519Bip32Engine::new())
    }

    fn golden_root(service: &RndDerivationService<Ed25519Bip32Engine>) -> RndKey<Root> {
        let seed_hash = hex::decode(GOLDEN_SEED_HASH).unwrap();
        RndKey::new(
            service
                .engine()
                .generate(&seed_hash, &Passphrase::empty())
                .unwrap(),
        )
    }

    #[test]
    fn test_seed_hash_vector() {
        let seed = Passphrase::new((0u8..16).collect::<Vec<u8>>());
        assert_eq!(
            hex::encode(hash_seed(&seed).unwrap().as_slice()),
            "5820ad03b5350b9692f5f0f535d9b101d978b8b32363b9a8894d0fa6c1f2ec333159"
        );
    }

    #[test]
    fn test_key_bundle_vectors() {
        let service = service();
        let root = golden_root(&service);
        let engine = service.engine();

        assert_eq!(
            hex::encode(engine.to_public(root.xprv()).as_bytes()),
            ROOT_XPUB
        );

        let bundle = service.build_key_bundle(&Passphrase::empty(), &root);
        assert_eq!(
            hex::encode(engine.to_public(bundle.account_key.xprv()).as_bytes()),
            ACCOUNT_XPUB
        );
        assert_eq!(
            hex::encode(bundle.payload_passphrase.as_bytes()),
            PAYLOAD_PASSPHRASE
        );

        let address = service.derive_address_private_key(
            &Passphrase::empty(),
            &bundle.account_key,
            Index::<Hardened>::from_offset(1).unwrap().into(),
        );
        assert_eq!(
            hex::encode(engine.to_public(address.xprv()).as_bytes()),
            ADDRESS_XPUB
        );
    }

    #[test]
    fn test_path_attribute_vectors() {
        let service = service();
        let payload_key = service.payload_passphrase(&golden_root(&service));

        let sentinel = DerivationPath::from_raw(0x8000_0000, 0x8000_0000);
        assert_eq!(
            hex::encode(service.encode_derivation_path(&sentinel).unwrap()),
            "9f1a800000001a80000000ff"
        );
        assert_eq!(
            hex::encode(
                service
                    .encode_derivation_path_attribute(&payload_key, &sentinel)
                    .unwrap()
            ),
            SENTINEL_PATH_ATTRIBUTE
        );

        let soft = DerivationPath::from_raw(0x8000_0000, 42);
        assert_eq!(
            hex::encode(service.encode_derivation_path(&soft).unwrap()),
            "9f1a80000000182aff"
        );
        assert_eq!(
            hex::encode(
                service
                    .encode_derivation_path_attribute(&payload_key, &soft)
                    .unwrap()
            ),
            SOFT_PATH_ATTRIBUTE
        );
    }

    /// An address carrying the legacy attribute bytes decodes to its path.
    #[test]
    fn test_legacy_address_decodes() {
        let service = service();
        let payload_key = service.payload_passphrase(&golden_root(&service));

        let mut attributes = AddressAttributes::new();
        attributes.insert(1, hex::decode(SOFT_PATH_ATTRIBUTE).unwrap());
        let address = AddressPayload::new(vec![0x42; 28], attributes)
            .to_cbor()
            .unwrap();

        assert_eq!(
            service.decode_address_derivation_path(&payload_key, &address),
            Ownership::Decoded(DerivationPath::from_raw(0x8000_0000, 42))
        );
        assert_eq!(
            service.decode_address_derivation_path(&Passphrase::from_key([0u8; 32]), &address),
            Ownership::NotMine
        );
    }
}
