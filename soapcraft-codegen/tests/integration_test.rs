use soapcraft_codegen::parser::wsdl::{parse_wsdl, parse_wsdl_with_imports};
use soapcraft_codegen::parser::xsd::SchemaItem;
use soapcraft_codegen::{CodegenError, SoapClientGenerator};
use std::fs;
use tempfile::tempdir;

/// A realistic document/literal WSDL with two operations and an imported
/// XSD schema, used to exercise the whole pipeline (parser -> resolver ->
/// IR -> emitter) end to end. Inline, since this retrieval pack carries no
/// `testdata/` fixture directory for the teacher's original tests to read.
fn calculator_wsdl() -> &'static str {
    r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:xs="http://www.w3.org/2001/XMLSchema"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="urn:calculator"
             targetNamespace="urn:calculator">
  <types>
    <xs:schema targetNamespace="urn:calculator" xmlns:tns="urn:calculator">
      <xs:element name="AddRequest">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="a" type="xs:int"/>
            <xs:element name="b" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="AddResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="result" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="SubtractRequest">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="a" type="xs:int"/>
            <xs:element name="b" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="SubtractResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="result" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
    </xs:schema>
  </types>
  <message name="AddRequestMessage"><part name="parameters" element="tns:AddRequest"/></message>
  <message name="AddResponseMessage"><part name="parameters" element="tns:AddResponse"/></message>
  <message name="SubtractRequestMessage"><part name="parameters" element="tns:SubtractRequest"/></message>
  <message name="SubtractResponseMessage"><part name="parameters" element="tns:SubtractResponse"/></message>
  <portType name="CalculatorPortType">
    <operation name="Add">
      <input message="tns:AddRequestMessage"/>
      <output message="tns:AddResponseMessage"/>
    </operation>
    <operation name="Subtract">
      <input message="tns:SubtractRequestMessage"/>
      <output message="tns:SubtractResponseMessage"/>
    </operation>
  </portType>
  <binding name="CalculatorBinding" type="tns:CalculatorPortType">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="Add">
      <soap:operation soapAction="urn:calculator/Add"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
    <operation name="Subtract">
      <soap:operation soapAction="urn:calculator/Subtract"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
  </binding>
  <service name="CalculatorService">
    <port name="CalculatorPort" binding="tns:CalculatorBinding">
      <soap:address location="http://example.test/calculator"/>
    </port>
  </service>
</definitions>"#
}

#[test]
fn test_generate_from_calculator_wsdl() {
    let dir = tempdir().unwrap();
    let wsdl_path = dir.path().join("calculator.wsdl");
    fs::write(&wsdl_path, calculator_wsdl()).unwrap();

    let result = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(dir.path())
        .generate();

    assert!(result.is_ok(), "Code generation failed: {:?}", result.err());

    let gen = result.unwrap();
    assert!(gen.output_file.exists(), "Generated file not found");

    let content = fs::read_to_string(&gen.output_file).unwrap();

    assert!(content.contains("pub struct"), "Should contain struct definitions");
    assert!(content.contains("impl"), "Should contain impl blocks");
    assert!(content.contains("CalculatorService"), "Should have CalculatorService client");
    assert!(content.contains("pub async fn add"), "Should have add operation");
    assert!(content.contains("pub async fn subtract"), "Should have subtract operation");
    assert!(content.contains("soapcraft_runtime::SoapResult"), "Should call into the runtime crate");
}

#[test]
fn test_generate_with_xsd_import() {
    let dir = tempdir().unwrap();

    // A separate XSD document defining the shared types, imported by the WSDL.
    let types_xsd = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="urn:shared-types"
           targetNamespace="urn:shared-types"
           elementFormDefault="qualified">
  <xs:complexType name="Address">
    <xs:sequence>
      <xs:element name="street" type="xs:string"/>
      <xs:element name="city" type="xs:string"/>
    </xs:sequence>
  </xs:complexType>
  <xs:element name="LookupRequest">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="zipCode" type="xs:string"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
  <xs:element name="LookupResponse">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="address" type="tns:Address"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;
    fs::write(dir.path().join("shared-types.xsd"), types_xsd).unwrap();

    let wsdl = r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:xs="http://www.w3.org/2001/XMLSchema"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="urn:lookup-service"
             xmlns:types="urn:shared-types"
             targetNamespace="urn:lookup-service">
  <types>
    <xs:schema targetNamespace="urn:lookup-service">
      <xs:import namespace="urn:shared-types" schemaLocation="shared-types.xsd"/>
    </xs:schema>
  </types>
  <message name="LookupRequestMessage"><part name="parameters" element="types:LookupRequest"/></message>
  <message name="LookupResponseMessage"><part name="parameters" element="types:LookupResponse"/></message>
  <portType name="LookupPortType">
    <operation name="Lookup">
      <input message="tns:LookupRequestMessage"/>
      <output message="tns:LookupResponseMessage"/>
    </operation>
  </portType>
  <binding name="LookupBinding" type="tns:LookupPortType">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="Lookup">
      <soap:operation soapAction="urn:lookup-service/Lookup"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
  </binding>
  <service name="LookupService">
    <port name="LookupPort" binding="tns:LookupBinding">
      <soap:address location="http://example.test/lookup"/>
    </port>
  </service>
</definitions>"#;
    let wsdl_path = dir.path().join("lookup.wsdl");
    fs::write(&wsdl_path, wsdl).unwrap();

    let result = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(dir.path())
        .generate();

    assert!(result.is_ok(), "Generation with xsd:import failed: {:?}", result.err());
    let gen = result.unwrap();
    let content = fs::read_to_string(&gen.output_file).unwrap();

    assert!(content.contains("pub struct Address"), "Should lower the imported complex type");
    assert!(content.contains("pub async fn lookup"), "Should have lookup operation");
}

#[test]
fn test_malformed_xml_is_rejected_before_reaching_the_emitter() {
    let dir = tempdir().unwrap();
    let wsdl_path = dir.path().join("broken.wsdl");
    // Unclosed root element: not well-formed XML, must fail in the reader
    // stage rather than reach the resolver or emitter.
    fs::write(&wsdl_path, "<definitions><types>").unwrap();

    let result = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(dir.path())
        .generate();

    assert!(result.is_err(), "Malformed XML should fail parsing, not silently emit a client");
}

#[test]
fn test_binding_referencing_unknown_port_type_yields_no_service_client() {
    // A port whose binding's portType can't be found is skipped rather
    // than erroring (ir::build treats it like an unsupported binding
    // style): the rest of the document still generates.
    let dir = tempdir().unwrap();
    let wsdl_path = dir.path().join("dangling.wsdl");
    fs::write(
        &wsdl_path,
        r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="urn:dangling"
             targetNamespace="urn:dangling">
  <binding name="OrphanBinding" type="tns:DoesNotExist">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
  </binding>
  <service name="OrphanService">
    <port name="OrphanPort" binding="tns:OrphanBinding">
      <soap:address location="http://example.test/orphan"/>
    </port>
  </service>
</definitions>"#,
    )
    .unwrap();

    let result = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(dir.path())
        .generate();

    assert!(result.is_ok(), "Generation should still succeed: {:?}", result.err());
    let content = fs::read_to_string(&result.unwrap().output_file).unwrap();
    assert!(
        !content.contains("pub struct OrphanService"),
        "No service client should be emitted for a binding with a missing portType"
    );
}

#[test]
fn test_missing_import_file_is_rejected() {
    // schemaLocation points at a file that was never written to the
    // tempdir: the import resolver's fetch must fail with ImportError
    // rather than the parser silently treating the namespace as empty.
    let dir = tempdir().unwrap();
    let wsdl = r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:xs="http://www.w3.org/2001/XMLSchema"
             xmlns:tns="urn:broken-import"
             targetNamespace="urn:broken-import">
  <types>
    <xs:schema targetNamespace="urn:broken-import">
      <xs:import namespace="urn:shared-types" schemaLocation="does-not-exist.xsd"/>
    </xs:schema>
  </types>
</definitions>"#;
    let wsdl_path = dir.path().join("broken-import.wsdl");
    fs::write(&wsdl_path, wsdl).unwrap();

    let result = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(dir.path())
        .generate();

    assert!(result.is_err(), "A dangling schemaLocation must fail generation, not be ignored");
}

#[test]
fn test_schema_import_cycle_short_circuits_without_error() {
    // a.xsd imports b.xsd, b.xsd imports a.xsd back: spec.md §5 treats an
    // already-loaded absolute location as something to skip, not an error
    // ("preventing re-fetch and cycle infinite-recursion"), so this must
    // terminate with every schema loaded exactly once rather than hang or
    // fail the whole parse.
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("a.xsd"),
        r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="urn:a" targetNamespace="urn:a" elementFormDefault="qualified">
  <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
</xs:schema>"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("b.xsd"),
        r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="urn:b" targetNamespace="urn:b" elementFormDefault="qualified">
  <xs:import namespace="urn:a" schemaLocation="a.xsd"/>
</xs:schema>"#,
    )
    .unwrap();

    let wsdl = r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:xs="http://www.w3.org/2001/XMLSchema"
             xmlns:tns="urn:cycle-root"
             targetNamespace="urn:cycle-root">
  <types>
    <xs:schema targetNamespace="urn:cycle-root">
      <xs:import namespace="urn:a" schemaLocation="a.xsd"/>
    </xs:schema>
  </types>
</definitions>"#;
    let wsdl_path = dir.path().join("cycle.wsdl");
    fs::write(&wsdl_path, wsdl).unwrap();

    let description = parse_wsdl_with_imports(&wsdl_path)
        .expect("a schema import cycle must short-circuit, not hang or fail the parse");

    // The root's inline schema, a.xsd, and b.xsd -- each loaded exactly
    // once even though b.xsd's import of a.xsd closes the cycle.
    assert_eq!(description.schemas.len(), 3);
}

#[test]
fn test_enum_lowering_and_self_referential_cycle_end_to_end() {
    // A named simpleType with enumeration facets lowers to a Rust enum;
    // a complexType that contains an optional element of its own type
    // lowers to a struct whose self-referencing field needs indirection
    // (Box) to compile as a finite-size struct.
    let dir = tempdir().unwrap();
    let wsdl = r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:xs="http://www.w3.org/2001/XMLSchema"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="urn:tree"
             targetNamespace="urn:tree">
  <types>
    <xs:schema targetNamespace="urn:tree" xmlns:tns="urn:tree">
      <xs:simpleType name="Status">
        <xs:restriction base="xs:string">
          <xs:enumeration value="pending"/>
          <xs:enumeration value="done"/>
        </xs:restriction>
      </xs:simpleType>
      <xs:complexType name="TreeNode">
        <xs:sequence>
          <xs:element name="status" type="tns:Status"/>
          <xs:element name="child" type="tns:TreeNode" minOccurs="0"/>
        </xs:sequence>
      </xs:complexType>
      <xs:element name="GetTreeRequest">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="id" type="xs:string"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="GetTreeResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="root" type="tns:TreeNode"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
    </xs:schema>
  </types>
  <message name="GetTreeRequestMessage"><part name="parameters" element="tns:GetTreeRequest"/></message>
  <message name="GetTreeResponseMessage"><part name="parameters" element="tns:GetTreeResponse"/></message>
  <portType name="TreePortType">
    <operation name="GetTree">
      <input message="tns:GetTreeRequestMessage"/>
      <output message="tns:GetTreeResponseMessage"/>
    </operation>
  </portType>
  <binding name="TreeBinding" type="tns:TreePortType">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="GetTree">
      <soap:operation soapAction="urn:tree/GetTree"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
  </binding>
  <service name="TreeService">
    <port name="TreePort" binding="tns:TreeBinding">
      <soap:address location="http://example.test/tree"/>
    </port>
  </service>
</definitions>"#;
    let wsdl_path = dir.path().join("tree.wsdl");
    fs::write(&wsdl_path, wsdl).unwrap();

    let result = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(dir.path())
        .generate();

    assert!(result.is_ok(), "Generation failed: {:?}", result.err());
    let content = fs::read_to_string(&result.unwrap().output_file).unwrap();

    assert!(content.contains("pub enum Status"), "Enumeration should lower to a Rust enum");
    assert!(content.contains("pub struct TreeNode"), "Should emit the self-referential struct");
    assert!(
        content.contains("Box<TreeNode>")
            || content.contains("Box < TreeNode >")
            || (content.contains("Box") && content.contains("TreeNode >")),
        "Self-referencing field should be boxed for indirection: {content}"
    );
    assert!(content.contains("pub async fn get_tree"), "Should have get_tree operation");
}

/// A WSDL shaped like the well-known `dataaccess.com` NumberConversion
/// service: one portType, two SOAP bindings (1.1 and 1.2) sharing it, one
/// service exposing both as separate ports. Exercises that a single
/// portType can be bound twice and that the service lowers to one client
/// with both operations regardless of which binding a port picks.
fn numberconversion_wsdl() -> &'static str {
    r#"<?xml version="1.0"?>
<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
                   xmlns:xs="http://www.w3.org/2001/XMLSchema"
                   xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
                   xmlns:soap12="http://schemas.xmlsoap.org/wsdl/soap12/"
                   xmlns:tns="http://www.dataaccess.com/webservicesserver/"
                   targetNamespace="http://www.dataaccess.com/webservicesserver/">
  <wsdl:types>
    <xs:schema targetNamespace="http://www.dataaccess.com/webservicesserver/"
               xmlns:tns="http://www.dataaccess.com/webservicesserver/"
               elementFormDefault="qualified">
      <xs:element name="NumberToWords">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="ubiNum" type="xs:unsignedLong"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="NumberToWordsResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="NumberToWordsResult" type="xs:string"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="NumberToDollars">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="dNum" type="xs:decimal"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="NumberToDollarsResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="NumberToDollarsResult" type="xs:string"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
    </xs:schema>
  </wsdl:types>
  <wsdl:message name="NumberToWordsSoapIn">
    <wsdl:part name="parameters" element="tns:NumberToWords"/>
  </wsdl:message>
  <wsdl:message name="NumberToWordsSoapOut">
    <wsdl:part name="parameters" element="tns:NumberToWordsResponse"/>
  </wsdl:message>
  <wsdl:message name="NumberToDollarsSoapIn">
    <wsdl:part name="parameters" element="tns:NumberToDollars"/>
  </wsdl:message>
  <wsdl:message name="NumberToDollarsSoapOut">
    <wsdl:part name="parameters" element="tns:NumberToDollarsResponse"/>
  </wsdl:message>
  <wsdl:portType name="NumberConversionSoapType">
    <wsdl:operation name="NumberToWords">
      <wsdl:input message="tns:NumberToWordsSoapIn"/>
      <wsdl:output message="tns:NumberToWordsSoapOut"/>
    </wsdl:operation>
    <wsdl:operation name="NumberToDollars">
      <wsdl:input message="tns:NumberToDollarsSoapIn"/>
      <wsdl:output message="tns:NumberToDollarsSoapOut"/>
    </wsdl:operation>
  </wsdl:portType>
  <wsdl:binding name="NumberConversionSoap" type="tns:NumberConversionSoapType">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <wsdl:operation name="NumberToWords">
      <soap:operation soapAction="http://www.dataaccess.com/webservicesserver/NumberToWords"/>
      <wsdl:input><soap:body use="literal"/></wsdl:input>
      <wsdl:output><soap:body use="literal"/></wsdl:output>
    </wsdl:operation>
    <wsdl:operation name="NumberToDollars">
      <soap:operation soapAction="http://www.dataaccess.com/webservicesserver/NumberToDollars"/>
      <wsdl:input><soap:body use="literal"/></wsdl:input>
      <wsdl:output><soap:body use="literal"/></wsdl:output>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:binding name="NumberConversionSoap12" type="tns:NumberConversionSoapType">
    <soap12:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <wsdl:operation name="NumberToWords">
      <soap12:operation soapAction="http://www.dataaccess.com/webservicesserver/NumberToWords"/>
      <wsdl:input><soap12:body use="literal"/></wsdl:input>
      <wsdl:output><soap12:body use="literal"/></wsdl:output>
    </wsdl:operation>
    <wsdl:operation name="NumberToDollars">
      <soap12:operation soapAction="http://www.dataaccess.com/webservicesserver/NumberToDollars"/>
      <wsdl:input><soap12:body use="literal"/></wsdl:input>
      <wsdl:output><soap12:body use="literal"/></wsdl:output>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:service name="NumberConversion">
    <wsdl:port name="NumberConversionSoap" binding="tns:NumberConversionSoap">
      <soap:address location="http://www.dataaccess.com/webservicesserver/NumberConversion.wso"/>
    </wsdl:port>
    <wsdl:port name="NumberConversionSoap12" binding="tns:NumberConversionSoap12">
      <soap12:address location="http://www.dataaccess.com/webservicesserver/NumberConversion.wso"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>"#
}

#[test]
fn test_numberconversion_wsdl_parses_to_exact_counts() {
    let description = parse_wsdl(numberconversion_wsdl()).expect("parses");

    assert_eq!(description.schemas.len(), 1, "one inline schema");
    assert_eq!(
        description.schemas[0].items.len(),
        4,
        "four top-level schema nodes"
    );
    match &description.schemas[0].items[0] {
        SchemaItem::Element(el) => {
            assert_eq!(el.name.namespace, "http://www.dataaccess.com/webservicesserver/");
            assert_eq!(el.name.local, "NumberToWords");
        }
        other => panic!("expected the first schema node to be an element, got {other:?}"),
    }

    assert_eq!(description.messages.len(), 4);
    assert_eq!(description.port_types.len(), 1);
    assert_eq!(description.port_types[0].operations.len(), 2);
    assert_eq!(description.bindings.len(), 2);
    assert_eq!(description.services.len(), 1);
    assert_eq!(description.services[0].ports.len(), 2);
}

#[test]
fn test_numberconversion_wsdl_emits_both_operations() {
    let dir = tempdir().unwrap();
    let wsdl_path = dir.path().join("numberconversion.wsdl");
    fs::write(&wsdl_path, numberconversion_wsdl()).unwrap();

    let generated = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(dir.path())
        .generate()
        .expect("generation succeeds");

    assert!(generated.code.contains("pub async fn number_to_words"));
    assert!(generated.code.contains("pub async fn number_to_dollars"));
}

#[test]
fn test_wsdl_importing_two_external_schemas_yields_three_schemas() {
    // <wsdl:types> holds one inline schema whose two xsd:import elements
    // each name a separate external schema document; after resolution
    // every referenced name must resolve and schemas.len() must count the
    // inline schema plus both imports.
    let dir = tempdir().unwrap();

    fs::write(
        dir.path().join("people.xsd"),
        r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="urn:people" targetNamespace="urn:people"
           elementFormDefault="qualified">
  <xs:complexType name="Person">
    <xs:sequence>
      <xs:element name="name" type="xs:string"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("addresses.xsd"),
        r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="urn:addresses" targetNamespace="urn:addresses"
           elementFormDefault="qualified">
  <xs:complexType name="Address">
    <xs:sequence>
      <xs:element name="city" type="xs:string"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#,
    )
    .unwrap();

    let wsdl = r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:xs="http://www.w3.org/2001/XMLSchema"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="urn:directory"
             xmlns:people="urn:people"
             xmlns:addresses="urn:addresses"
             targetNamespace="urn:directory">
  <types>
    <xs:schema targetNamespace="urn:directory">
      <xs:import namespace="urn:people" schemaLocation="people.xsd"/>
      <xs:import namespace="urn:addresses" schemaLocation="addresses.xsd"/>
      <xs:element name="DirectoryEntry">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="person" type="people:Person"/>
            <xs:element name="address" type="addresses:Address"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
    </xs:schema>
  </types>
  <message name="LookupRequestMessage"><part name="parameters" element="tns:DirectoryEntry"/></message>
  <message name="LookupResponseMessage"><part name="parameters" element="tns:DirectoryEntry"/></message>
  <portType name="DirectoryPortType">
    <operation name="Lookup">
      <input message="tns:LookupRequestMessage"/>
      <output message="tns:LookupResponseMessage"/>
    </operation>
  </portType>
  <binding name="DirectoryBinding" type="tns:DirectoryPortType">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="Lookup">
      <soap:operation soapAction="urn:directory/Lookup"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
  </binding>
  <service name="DirectoryService">
    <port name="DirectoryPort" binding="tns:DirectoryBinding">
      <soap:address location="http://example.test/directory"/>
    </port>
  </service>
</definitions>"#;
    let wsdl_path = dir.path().join("directory.wsdl");
    fs::write(&wsdl_path, wsdl).unwrap();

    let description = parse_wsdl_with_imports(&wsdl_path).expect("parses and follows both imports");
    assert_eq!(description.schemas.len(), 3, "inline schema + 2 imported schemas");

    let generated = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(dir.path())
        .generate()
        .expect("every imported reference resolves");
    assert!(generated.code.contains("pub struct Person"));
    assert!(generated.code.contains("pub struct Address"));
}

#[test]
fn test_generating_from_a_nonexistent_wsdl_path_is_an_io_error() {
    let dir = tempdir().unwrap();
    let missing_path = dir.path().join("does-not-exist.wsdl");

    let result = SoapClientGenerator::builder()
        .wsdl_path(&missing_path)
        .out_dir(dir.path())
        .generate();

    match result {
        Err(CodegenError::IoError { .. }) => {}
        other => panic!("expected CodegenError::IoError for a missing WSDL file, got {other:?}"),
    }
}
