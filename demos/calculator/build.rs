use soapcraft_codegen::SoapClientGenerator;
use std::path::PathBuf;

/// A calculator WSDL in the shape of the public dneonline.com Calculator
/// service (Add/Subtract/Multiply/Divide over document/literal SOAP 1.1),
/// embedded here since this retrieval pack carries no `testdata/` fixture
/// directory for `include_str!` to reach.
const CALCULATOR_WSDL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:xs="http://www.w3.org/2001/XMLSchema"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="http://tempuri.org/"
             targetNamespace="http://tempuri.org/">
  <types>
    <xs:schema targetNamespace="http://tempuri.org/" xmlns:tns="http://tempuri.org/" elementFormDefault="qualified">
      <xs:element name="Add">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="intA" type="xs:int"/>
            <xs:element name="intB" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="AddResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="AddResult" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="Subtract">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="intA" type="xs:int"/>
            <xs:element name="intB" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="SubtractResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="SubtractResult" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="Multiply">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="intA" type="xs:int"/>
            <xs:element name="intB" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="MultiplyResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="MultiplyResult" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="Divide">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="intA" type="xs:int"/>
            <xs:element name="intB" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
      <xs:element name="DivideResponse">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="DivideResult" type="xs:int"/>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
    </xs:schema>
  </types>

  <message name="AddSoapIn"><part name="parameters" element="tns:Add"/></message>
  <message name="AddSoapOut"><part name="parameters" element="tns:AddResponse"/></message>
  <message name="SubtractSoapIn"><part name="parameters" element="tns:Subtract"/></message>
  <message name="SubtractSoapOut"><part name="parameters" element="tns:SubtractResponse"/></message>
  <message name="MultiplySoapIn"><part name="parameters" element="tns:Multiply"/></message>
  <message name="MultiplySoapOut"><part name="parameters" element="tns:MultiplyResponse"/></message>
  <message name="DivideSoapIn"><part name="parameters" element="tns:Divide"/></message>
  <message name="DivideSoapOut"><part name="parameters" element="tns:DivideResponse"/></message>

  <portType name="CalculatorSoap">
    <operation name="Add">
      <input message="tns:AddSoapIn"/>
      <output message="tns:AddSoapOut"/>
    </operation>
    <operation name="Subtract">
      <input message="tns:SubtractSoapIn"/>
      <output message="tns:SubtractSoapOut"/>
    </operation>
    <operation name="Multiply">
      <input message="tns:MultiplySoapIn"/>
      <output message="tns:MultiplySoapOut"/>
    </operation>
    <operation name="Divide">
      <input message="tns:DivideSoapIn"/>
      <output message="tns:DivideSoapOut"/>
    </operation>
  </portType>

  <binding name="CalculatorSoapBinding" type="tns:CalculatorSoap">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="Add">
      <soap:operation soapAction="http://tempuri.org/Add"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
    <operation name="Subtract">
      <soap:operation soapAction="http://tempuri.org/Subtract"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
    <operation name="Multiply">
      <soap:operation soapAction="http://tempuri.org/Multiply"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
    <operation name="Divide">
      <soap:operation soapAction="http://tempuri.org/Divide"/>
      <input><soap:body use="literal"/></input>
      <output><soap:body use="literal"/></output>
    </operation>
  </binding>

  <service name="Calculator">
    <port name="CalculatorSoap" binding="tns:CalculatorSoapBinding">
      <soap:address location="http://www.dneonline.com/calculator.asmx"/>
    </port>
  </service>
</definitions>"#;

fn main() {
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    let wsdl_path = PathBuf::from(&out_dir).join("calculator.wsdl");
    std::fs::write(&wsdl_path, CALCULATOR_WSDL).expect("failed to write embedded calculator WSDL");

    println!("cargo:rerun-if-changed=build.rs");

    SoapClientGenerator::builder()
        .wsdl_path(wsdl_path.to_str().expect("Invalid WSDL path"))
        .out_dir(&out_dir)
        .generate()
        .expect("Failed to generate SOAP client from WSDL");

    println!(
        "cargo:warning=SOAP client generated successfully in {}",
        out_dir
    );
}
